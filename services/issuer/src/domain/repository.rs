#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::types::{MailConfig, OtpRecord, OutboundMessage, Template, Tenant};
use crate::error::{IssuerError, MailError};

/// Repository for tenants. The store enforces API-key uniqueness.
pub trait TenantRepository: Send + Sync {
    async fn find_by_api_key(&self, api_key: &str) -> Result<Option<Tenant>, IssuerError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tenant>, IssuerError>;

    async fn list(&self) -> Result<Vec<Tenant>, IssuerError>;

    async fn create(&self, tenant: &Tenant) -> Result<(), IssuerError>;

    /// Replace the mail configuration. Returns `false` if the tenant doesn't exist.
    async fn update_mail_config(&self, id: Uuid, config: &MailConfig)
    -> Result<bool, IssuerError>;

    /// Delete a tenant together with its templates and OTP records.
    /// Returns `false` if the tenant doesn't exist.
    async fn delete(&self, id: Uuid) -> Result<bool, IssuerError>;
}

/// Repository for message templates, always scoped by owning tenant.
pub trait TemplateRepository: Send + Sync {
    async fn find(&self, tenant_id: Uuid, id: &str) -> Result<Option<Template>, IssuerError>;

    async fn list_by_tenant(&self, tenant_id: Uuid) -> Result<Vec<Template>, IssuerError>;

    /// Insert, or replace name/subject/body of an existing (tenant, id) template.
    async fn upsert(&self, template: &Template) -> Result<(), IssuerError>;

    /// Delete a template. Returns `true` if deleted, `false` if not found.
    async fn delete(&self, tenant_id: Uuid, id: &str) -> Result<bool, IssuerError>;
}

/// Repository for issued passcodes.
pub trait OtpRepository: Send + Sync {
    async fn insert(&self, record: &OtpRecord) -> Result<(), IssuerError>;

    /// The most recently issued unconsumed record matching all three keys,
    /// whether or not it has expired.
    async fn find_latest_unconsumed(
        &self,
        tenant_id: Uuid,
        recipient: &str,
        code: &str,
    ) -> Result<Option<OtpRecord>, IssuerError>;

    /// Set `consumed_at` only if the record is still unconsumed, as a single
    /// conditional write. Returns `false` when another caller got there first.
    async fn consume(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, IssuerError>;

    /// Newest-first records for a tenant, at most `limit`.
    async fn list_recent(&self, tenant_id: Uuid, limit: u64)
    -> Result<Vec<OtpRecord>, IssuerError>;
}

/// Port for outbound mail delivery.
pub trait MailPort: Send + Sync {
    async fn send(&self, config: &MailConfig, message: &OutboundMessage) -> Result<(), MailError>;

    /// Connect and authenticate against the transport without sending anything.
    async fn verify_config(&self, config: &MailConfig) -> Result<(), MailError>;
}
