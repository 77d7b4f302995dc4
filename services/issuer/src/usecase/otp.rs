use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::domain::render::{TemplateFields, render};
use crate::domain::repository::{MailPort, OtpRepository, TemplateRepository, TenantRepository};
use crate::domain::types::{DEFAULT_FRIENDLY_NAME, OutboundMessage, Tenant, VerifyOutcome};
use crate::error::IssuerError;
use crate::usecase::ledger::OtpLedger;
use crate::usecase::tenant::resolve_tenant;

/// Build the field list a template is rendered with.
///
/// Order matters: the renderer resolves case-insensitive collisions
/// first-seen-wins, so the issued code can't be shadowed by a caller field.
/// `user` is taken from a non-blank `USERNAME`, else from a non-blank caller
/// `user`, else falls back to a fixed friendly name.
pub fn build_fields(code: &str, caller: &BTreeMap<String, String>) -> TemplateFields {
    fn blank(v: &str) -> bool {
        v.trim().is_empty()
    }

    let mut fields = TemplateFields::new();
    fields.push("OTP", code).push("otp", code);

    let username = caller
        .iter()
        .find(|(k, v)| k.eq_ignore_ascii_case("username") && !blank(v));
    if let Some((_, name)) = username {
        fields.push("user", name.as_str());
    }

    for (k, v) in caller {
        if k.eq_ignore_ascii_case("user") && blank(v) {
            continue;
        }
        fields.push(k.as_str(), v.as_str());
    }

    if !fields.contains("user") {
        fields.push("user", DEFAULT_FRIENDLY_NAME);
    }
    fields
}

// ── SendOtp ──────────────────────────────────────────────────────────────────

pub struct SendOtpInput {
    pub recipient: String,
    pub template_id: String,
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct SendOtpOutput {
    pub expires_at: DateTime<Utc>,
}

pub struct SendOtpUseCase<T, P, O, M>
where
    T: TenantRepository,
    P: TemplateRepository,
    O: OtpRepository,
    M: MailPort,
{
    pub tenants: T,
    pub templates: P,
    pub ledger: OtpLedger<O>,
    pub mailer: M,
}

impl<T, P, O, M> SendOtpUseCase<T, P, O, M>
where
    T: TenantRepository,
    P: TemplateRepository,
    O: OtpRepository,
    M: MailPort,
{
    pub async fn execute(
        &self,
        api_key: &str,
        input: SendOtpInput,
    ) -> Result<SendOtpOutput, IssuerError> {
        let tenant = resolve_tenant(&self.tenants, api_key).await?;
        self.send_for_tenant(&tenant, input).await
    }

    /// Issue and deliver a code on behalf of an already-resolved tenant.
    ///
    /// A delivery failure does not retract the issued record: the code stays
    /// verifiable even though the mail never arrived.
    pub async fn send_for_tenant(
        &self,
        tenant: &Tenant,
        input: SendOtpInput,
    ) -> Result<SendOtpOutput, IssuerError> {
        let template = self
            .templates
            .find(tenant.id, &input.template_id)
            .await?
            .ok_or(IssuerError::TemplateNotFound)?;

        if !tenant.mail.is_complete() {
            return Err(IssuerError::MailNotConfigured);
        }

        let record = self.ledger.issue(tenant.id, &input.recipient).await?;

        let fields = build_fields(&record.code, &input.fields);
        let message = OutboundMessage {
            to: input.recipient,
            subject: render(Some(&template.subject), Some(&fields)),
            html_body: render(Some(&template.body), Some(&fields)),
        };

        if let Err(e) = self.mailer.send(&tenant.mail, &message).await {
            tracing::warn!(
                tenant_id = %tenant.id,
                otp_id = %record.id,
                error = %e,
                "otp issued but delivery failed"
            );
            return Err(IssuerError::DeliveryFailed(e.to_string()));
        }

        Ok(SendOtpOutput {
            expires_at: record.expires_at,
        })
    }
}

// ── VerifyOtp ────────────────────────────────────────────────────────────────

pub struct VerifyOtpInput {
    pub recipient: String,
    pub code: String,
}

pub struct VerifyOtpUseCase<T: TenantRepository, O: OtpRepository> {
    pub tenants: T,
    pub ledger: OtpLedger<O>,
}

impl<T: TenantRepository, O: OtpRepository> VerifyOtpUseCase<T, O> {
    pub async fn execute(&self, api_key: &str, input: VerifyOtpInput) -> Result<(), IssuerError> {
        let tenant = resolve_tenant(&self.tenants, api_key).await?;
        self.verify_for_tenant(&tenant, input).await
    }

    pub async fn verify_for_tenant(
        &self,
        tenant: &Tenant,
        input: VerifyOtpInput,
    ) -> Result<(), IssuerError> {
        match self
            .ledger
            .verify(tenant.id, &input.recipient, input.code.trim())
            .await?
        {
            VerifyOutcome::Valid => Ok(()),
            VerifyOutcome::Expired => Err(IssuerError::ExpiredOtp),
            VerifyOutcome::Invalid => Err(IssuerError::InvalidOtp),
        }
    }
}
