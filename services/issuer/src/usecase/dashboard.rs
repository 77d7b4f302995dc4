use uuid::Uuid;

use crate::domain::repository::{OtpRepository, TemplateRepository, TenantRepository};
use crate::domain::types::{DASHBOARD_RECENT_OTPS, OtpRecord, Template, Tenant};
use crate::error::IssuerError;

#[derive(Debug)]
pub struct Dashboard {
    pub tenant: Tenant,
    pub templates: Vec<Template>,
    /// Newest first, bounded by `DASHBOARD_RECENT_OTPS`.
    pub recent_otps: Vec<OtpRecord>,
}

pub struct DashboardUseCase<T: TenantRepository, P: TemplateRepository, O: OtpRepository> {
    pub tenants: T,
    pub templates: P,
    pub otps: O,
}

impl<T, P, O> DashboardUseCase<T, P, O>
where
    T: TenantRepository,
    P: TemplateRepository,
    O: OtpRepository,
{
    pub async fn execute(&self, tenant_id: Uuid) -> Result<Dashboard, IssuerError> {
        let tenant = self
            .tenants
            .find_by_id(tenant_id)
            .await?
            .ok_or(IssuerError::TenantNotFound)?;
        let templates = self.templates.list_by_tenant(tenant_id).await?;
        let recent_otps = self
            .otps
            .list_recent(tenant_id, DASHBOARD_RECENT_OTPS)
            .await?;
        Ok(Dashboard {
            tenant,
            templates,
            recent_otps,
        })
    }
}
