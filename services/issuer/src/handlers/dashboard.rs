use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use uuid::Uuid;

use otpgate_auth_types::credentials::AdminToken;

use crate::domain::types::OtpRecord;
use crate::error::IssuerError;
use crate::handlers::templates::TemplateResponse;
use crate::handlers::tenants::TenantResponse;
use crate::state::AppState;
use crate::usecase::dashboard::DashboardUseCase;

#[derive(Serialize)]
pub struct OtpRecordResponse {
    pub id: Uuid,
    pub recipient: String,
    pub code: String,
    #[serde(serialize_with = "otpgate_core::serde::to_rfc3339_ms")]
    pub issued_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "otpgate_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "otpgate_core::serde::option_to_rfc3339_ms")]
    pub consumed_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<OtpRecord> for OtpRecordResponse {
    fn from(r: OtpRecord) -> Self {
        Self {
            id: r.id,
            recipient: r.recipient,
            code: r.code,
            issued_at: r.issued_at,
            expires_at: r.expires_at,
            consumed_at: r.consumed_at,
        }
    }
}

#[derive(Serialize)]
pub struct DashboardResponse {
    pub tenant: TenantResponse,
    pub templates: Vec<TemplateResponse>,
    pub recent_otps: Vec<OtpRecordResponse>,
}

// ── GET /admin/tenants/{tenant_id}/dashboard ─────────────────────────────────

pub async fn get_dashboard(
    admin: AdminToken,
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<Json<DashboardResponse>, IssuerError> {
    state.authorize_admin(&admin)?;
    let usecase = DashboardUseCase {
        tenants: state.tenant_repo(),
        templates: state.template_repo(),
        otps: state.otp_repo(),
    };
    let dashboard = usecase.execute(tenant_id).await?;
    Ok(Json(DashboardResponse {
        tenant: dashboard.tenant.into(),
        templates: dashboard.templates.into_iter().map(Into::into).collect(),
        recent_otps: dashboard.recent_otps.into_iter().map(Into::into).collect(),
    }))
}
