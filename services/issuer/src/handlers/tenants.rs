use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use otpgate_auth_types::credentials::AdminToken;

use crate::domain::types::{MailConfig, MailTransport, Tenant};
use crate::error::IssuerError;
use crate::state::AppState;
use crate::usecase::tenant::{
    CreateTenantInput, CreateTenantUseCase, DeleteTenantUseCase, ListTenantsUseCase,
    UpdateMailConfigUseCase,
};

// ── POST /admin/tenants ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct CreateTenantResponse {
    pub id: Uuid,
    pub api_key: String,
}

pub async fn create_tenant(
    admin: AdminToken,
    State(state): State<AppState>,
    Json(body): Json<CreateTenantRequest>,
) -> Result<(StatusCode, Json<CreateTenantResponse>), IssuerError> {
    state.authorize_admin(&admin)?;
    let usecase = CreateTenantUseCase {
        tenants: state.tenant_repo(),
    };
    let output = usecase
        .execute(CreateTenantInput { name: body.name })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateTenantResponse {
            id: output.id,
            api_key: output.api_key,
        }),
    ))
}

// ── GET /admin/tenants ───────────────────────────────────────────────────────

/// Tenant as shown to administrators. Never carries the SMTP password.
#[derive(Serialize)]
pub struct TenantResponse {
    pub id: Uuid,
    pub name: String,
    pub api_key: String,
    pub mail_transport: MailTransport,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub sender_name: Option<String>,
    pub sender_picture: Option<String>,
    pub mail_configured: bool,
    #[serde(serialize_with = "otpgate_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "otpgate_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Tenant> for TenantResponse {
    fn from(t: Tenant) -> Self {
        let mail_configured = t.mail.is_complete();
        Self {
            id: t.id,
            name: t.name,
            api_key: t.api_key,
            mail_transport: t.mail.transport,
            smtp_host: t.mail.host,
            smtp_port: t.mail.port,
            smtp_username: t.mail.username,
            sender_name: t.mail.sender_name,
            sender_picture: t.mail.sender_picture,
            mail_configured,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

pub async fn list_tenants(
    admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<Vec<TenantResponse>>, IssuerError> {
    state.authorize_admin(&admin)?;
    let usecase = ListTenantsUseCase {
        tenants: state.tenant_repo(),
    };
    let tenants = usecase.execute().await?;
    Ok(Json(tenants.into_iter().map(TenantResponse::from).collect()))
}

// ── DELETE /admin/tenants/{tenant_id} ────────────────────────────────────────

pub async fn delete_tenant(
    admin: AdminToken,
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
) -> Result<StatusCode, IssuerError> {
    state.authorize_admin(&admin)?;
    let usecase = DeleteTenantUseCase {
        tenants: state.tenant_repo(),
    };
    usecase.execute(tenant_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /admin/tenants/{tenant_id}/mail-config ───────────────────────────────

#[derive(Deserialize)]
pub struct MailConfigRequest {
    #[serde(default)]
    pub mail_transport: MailTransport,
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    pub sender_name: Option<String>,
    pub sender_picture: Option<String>,
}

impl From<MailConfigRequest> for MailConfig {
    fn from(r: MailConfigRequest) -> Self {
        Self {
            transport: r.mail_transport,
            host: r.smtp_host,
            port: r.smtp_port,
            username: r.smtp_username,
            password: r.smtp_password,
            sender_name: r.sender_name,
            sender_picture: r.sender_picture,
        }
    }
}

pub async fn update_mail_config(
    admin: AdminToken,
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(body): Json<MailConfigRequest>,
) -> Result<StatusCode, IssuerError> {
    state.authorize_admin(&admin)?;
    let usecase = UpdateMailConfigUseCase {
        tenants: state.tenant_repo(),
        mailer: state.mailer(),
    };
    usecase.execute(tenant_id, body.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}
