use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{TemplateRepository, TenantRepository};
use crate::domain::types::Template;
use crate::error::IssuerError;

// ── UpsertTemplate ───────────────────────────────────────────────────────────

pub struct UpsertTemplateInput {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
}

pub struct UpsertTemplateUseCase<T: TenantRepository, P: TemplateRepository> {
    pub tenants: T,
    pub templates: P,
}

impl<T: TenantRepository, P: TemplateRepository> UpsertTemplateUseCase<T, P> {
    /// Create a template, or replace the content of the tenant's template with
    /// the same id.
    pub async fn execute(
        &self,
        tenant_id: Uuid,
        input: UpsertTemplateInput,
    ) -> Result<Template, IssuerError> {
        let id = input.id.trim();
        if id.is_empty() {
            return Err(IssuerError::MissingData);
        }
        if self.tenants.find_by_id(tenant_id).await?.is_none() {
            return Err(IssuerError::TenantNotFound);
        }

        let now = Utc::now();
        let template = Template {
            tenant_id,
            id: id.to_owned(),
            name: input.name,
            subject: input.subject,
            body: input.body,
            created_at: now,
            updated_at: now,
        };
        self.templates.upsert(&template).await?;
        Ok(template)
    }
}

// ── DeleteTemplate ───────────────────────────────────────────────────────────

pub struct DeleteTemplateUseCase<P: TemplateRepository> {
    pub templates: P,
}

impl<P: TemplateRepository> DeleteTemplateUseCase<P> {
    pub async fn execute(&self, tenant_id: Uuid, id: &str) -> Result<(), IssuerError> {
        if !self.templates.delete(tenant_id, id).await? {
            return Err(IssuerError::TemplateNotFound);
        }
        Ok(())
    }
}
