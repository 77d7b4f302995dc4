use axum::Json;
use axum::http::StatusCode;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Handler for `GET /status`: human-readable liveness with server time.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
