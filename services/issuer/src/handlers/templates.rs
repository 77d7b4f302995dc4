use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use otpgate_auth_types::credentials::AdminToken;

use crate::domain::types::Template;
use crate::error::IssuerError;
use crate::state::AppState;
use crate::usecase::template::{DeleteTemplateUseCase, UpsertTemplateInput, UpsertTemplateUseCase};

#[derive(Serialize)]
pub struct TemplateResponse {
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    #[serde(serialize_with = "otpgate_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Template> for TemplateResponse {
    fn from(t: Template) -> Self {
        Self {
            id: t.id,
            name: t.name,
            subject: t.subject,
            body: t.body,
            updated_at: t.updated_at,
        }
    }
}

// ── PUT /admin/tenants/{tenant_id}/templates/{template_id} ───────────────────

#[derive(Deserialize)]
pub struct UpsertTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
}

pub async fn upsert_template(
    admin: AdminToken,
    State(state): State<AppState>,
    Path((tenant_id, template_id)): Path<(Uuid, String)>,
    Json(body): Json<UpsertTemplateRequest>,
) -> Result<Json<TemplateResponse>, IssuerError> {
    state.authorize_admin(&admin)?;
    let usecase = UpsertTemplateUseCase {
        tenants: state.tenant_repo(),
        templates: state.template_repo(),
    };
    let template = usecase
        .execute(
            tenant_id,
            UpsertTemplateInput {
                id: template_id,
                name: body.name,
                subject: body.subject,
                body: body.body,
            },
        )
        .await?;
    Ok(Json(template.into()))
}

// ── DELETE /admin/tenants/{tenant_id}/templates/{template_id} ────────────────

pub async fn delete_template(
    admin: AdminToken,
    State(state): State<AppState>,
    Path((tenant_id, template_id)): Path<(Uuid, String)>,
) -> Result<StatusCode, IssuerError> {
    state.authorize_admin(&admin)?;
    let usecase = DeleteTemplateUseCase {
        templates: state.template_repo(),
    };
    usecase.execute(tenant_id, &template_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
