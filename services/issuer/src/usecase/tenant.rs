use chrono::Utc;
use uuid::Uuid;

use crate::domain::repository::{MailPort, TenantRepository};
use crate::domain::types::{API_KEY_PREFIX, MailConfig, Tenant};
use crate::error::IssuerError;

/// `sk_` followed by the 32 hex digits of a random UUID.
pub fn generate_api_key() -> String {
    format!("{API_KEY_PREFIX}{}", Uuid::new_v4().simple())
}

/// Resolve an integration's API key to its tenant. This is the only
/// authorization step for send and verify.
pub async fn resolve_tenant<T: TenantRepository>(
    tenants: &T,
    api_key: &str,
) -> Result<Tenant, IssuerError> {
    tenants
        .find_by_api_key(api_key)
        .await?
        .ok_or(IssuerError::InvalidApiKey)
}

// ── CreateTenant ─────────────────────────────────────────────────────────────

pub struct CreateTenantInput {
    pub name: String,
}

#[derive(Debug)]
pub struct CreateTenantOutput {
    pub id: Uuid,
    pub api_key: String,
}

pub struct CreateTenantUseCase<T: TenantRepository> {
    pub tenants: T,
}

impl<T: TenantRepository> CreateTenantUseCase<T> {
    pub async fn execute(
        &self,
        input: CreateTenantInput,
    ) -> Result<CreateTenantOutput, IssuerError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(IssuerError::MissingData);
        }

        let now = Utc::now();
        let tenant = Tenant {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            api_key: generate_api_key(),
            mail: MailConfig::default(),
            created_at: now,
            updated_at: now,
        };
        self.tenants.create(&tenant).await?;

        tracing::info!(tenant_id = %tenant.id, name = %tenant.name, "tenant created");
        Ok(CreateTenantOutput {
            id: tenant.id,
            api_key: tenant.api_key,
        })
    }
}

// ── ListTenants ──────────────────────────────────────────────────────────────

pub struct ListTenantsUseCase<T: TenantRepository> {
    pub tenants: T,
}

impl<T: TenantRepository> ListTenantsUseCase<T> {
    pub async fn execute(&self) -> Result<Vec<Tenant>, IssuerError> {
        self.tenants.list().await
    }
}

// ── UpdateMailConfig ─────────────────────────────────────────────────────────

pub struct UpdateMailConfigUseCase<T: TenantRepository, M: MailPort> {
    pub tenants: T,
    pub mailer: M,
}

impl<T: TenantRepository, M: MailPort> UpdateMailConfigUseCase<T, M> {
    /// Replace a tenant's mail configuration after a live check against the
    /// transport. Nothing is written unless the check passes.
    pub async fn execute(&self, tenant_id: Uuid, config: MailConfig) -> Result<(), IssuerError> {
        if self.tenants.find_by_id(tenant_id).await?.is_none() {
            return Err(IssuerError::TenantNotFound);
        }

        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(IssuerError::InvalidMailConfig(format!(
                "missing {}",
                missing.join(", ")
            )));
        }

        if let Err(e) = self.mailer.verify_config(&config).await {
            tracing::warn!(%tenant_id, error = %e, "mail configuration rejected by live check");
            return Err(IssuerError::InvalidMailConfig(e.to_string()));
        }

        if !self.tenants.update_mail_config(tenant_id, &config).await? {
            return Err(IssuerError::TenantNotFound);
        }
        tracing::info!(%tenant_id, transport = config.transport.as_str(), "mail configuration updated");
        Ok(())
    }
}

// ── DeleteTenant ─────────────────────────────────────────────────────────────

pub struct DeleteTenantUseCase<T: TenantRepository> {
    pub tenants: T,
}

impl<T: TenantRepository> DeleteTenantUseCase<T> {
    /// Irreversible; templates and OTP records go with the tenant.
    pub async fn execute(&self, tenant_id: Uuid) -> Result<(), IssuerError> {
        if !self.tenants.delete(tenant_id).await? {
            return Err(IssuerError::TenantNotFound);
        }
        tracing::info!(%tenant_id, "tenant deleted");
        Ok(())
    }
}
