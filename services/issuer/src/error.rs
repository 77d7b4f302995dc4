use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Issuer service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum IssuerError {
    #[error("invalid api key")]
    InvalidApiKey,
    #[error("unauthorized")]
    Unauthorized,
    #[error("tenant not found")]
    TenantNotFound,
    #[error("template not found")]
    TemplateNotFound,
    #[error("mail not configured")]
    MailNotConfigured,
    #[error("invalid mail configuration: {0}")]
    InvalidMailConfig(String),
    #[error("invalid otp")]
    InvalidOtp,
    #[error("otp expired")]
    ExpiredOtp,
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("invalid recipient address")]
    InvalidRecipient,
    #[error("missing data")]
    MissingData,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IssuerError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidApiKey => "INVALID_API_KEY",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TenantNotFound => "TENANT_NOT_FOUND",
            Self::TemplateNotFound => "TEMPLATE_NOT_FOUND",
            Self::MailNotConfigured => "MAIL_NOT_CONFIGURED",
            Self::InvalidMailConfig(_) => "INVALID_MAIL_CONFIG",
            Self::InvalidOtp => "INVALID_OTP",
            Self::ExpiredOtp => "EXPIRED_OTP",
            Self::DeliveryFailed(_) => "DELIVERY_FAILED",
            Self::InvalidRecipient => "INVALID_RECIPIENT",
            Self::MissingData => "MISSING_DATA",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for IssuerError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidApiKey => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::TenantNotFound | Self::TemplateNotFound => StatusCode::NOT_FOUND,
            Self::MailNotConfigured
            | Self::InvalidMailConfig(_)
            | Self::InvalidOtp
            | Self::ExpiredOtp
            | Self::InvalidRecipient
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::DeliveryFailed(_) => StatusCode::BAD_GATEWAY,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer already records method/uri/status; only 500s need the anyhow chain.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}

/// Failure reported by the outbound mail capability.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("mail transport not configured")]
    NotConfigured,
    #[error("connection error: {0}")]
    Connection(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("send failed: {0}")]
    SendFailed(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
