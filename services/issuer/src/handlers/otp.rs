use std::collections::BTreeMap;

use axum::{Json, extract::State, http::StatusCode};
use lettre::Address;
use serde::{Deserialize, Serialize};

use otpgate_auth_types::credentials::ApiKeyHeader;

use crate::error::IssuerError;
use crate::state::AppState;
use crate::usecase::otp::{SendOtpInput, SendOtpUseCase, VerifyOtpInput, VerifyOtpUseCase};

/// Caller-supplied template fields may be any JSON scalar; strings are used
/// as-is and everything else is rendered as its JSON text.
fn stringify_fields(fields: BTreeMap<String, serde_json::Value>) -> BTreeMap<String, String> {
    fields
        .into_iter()
        .map(|(k, v)| {
            let v = match v {
                serde_json::Value::String(s) => s,
                serde_json::Value::Null => String::new(),
                other => other.to_string(),
            };
            (k, v)
        })
        .collect()
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

// ── POST /v1/otp/send ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
    pub template_id: String,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_json::Value>,
}

#[derive(Serialize)]
pub struct SendOtpResponse {
    pub message: &'static str,
    #[serde(serialize_with = "otpgate_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn send_otp(
    ApiKeyHeader(api_key): ApiKeyHeader,
    State(state): State<AppState>,
    Json(body): Json<SendOtpRequest>,
) -> Result<(StatusCode, Json<SendOtpResponse>), IssuerError> {
    if body.email.trim().is_empty() || body.template_id.trim().is_empty() {
        return Err(IssuerError::MissingData);
    }
    // Reject before a code is issued for an address mail can never reach.
    if body.email.trim().parse::<Address>().is_err() {
        return Err(IssuerError::InvalidRecipient);
    }
    let usecase = SendOtpUseCase {
        tenants: state.tenant_repo(),
        templates: state.template_repo(),
        ledger: state.ledger(),
        mailer: state.mailer(),
    };
    let output = usecase
        .execute(
            &api_key,
            SendOtpInput {
                recipient: body.email.trim().to_owned(),
                template_id: body.template_id,
                fields: stringify_fields(body.fields),
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SendOtpResponse {
            message: "otp sent",
            expires_at: output.expires_at,
        }),
    ))
}

// ── POST /v1/otp/verify ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

pub async fn verify_otp(
    ApiKeyHeader(api_key): ApiKeyHeader,
    State(state): State<AppState>,
    Json(body): Json<VerifyOtpRequest>,
) -> Result<Json<MessageResponse>, IssuerError> {
    if body.email.trim().is_empty() || body.code.trim().is_empty() {
        return Err(IssuerError::MissingData);
    }
    let usecase = VerifyOtpUseCase {
        tenants: state.tenant_repo(),
        ledger: state.ledger(),
    };
    usecase
        .execute(
            &api_key,
            VerifyOtpInput {
                recipient: body.email.trim().to_owned(),
                code: body.code,
            },
        )
        .await?;
    Ok(Json(MessageResponse {
        message: "otp verified",
    }))
}
