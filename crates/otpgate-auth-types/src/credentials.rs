//! Credential extractors for the two caller classes: integrations presenting
//! a tenant API key, and administrators presenting the shared admin secret.

use axum::extract::FromRequestParts;
use axum_extra::extract::cookie::CookieJar;
use http::StatusCode;
use http::request::Parts;

/// Header carrying a tenant API key.
pub const X_API_KEY: &str = "x-api-key";

/// Cookie carrying the admin secret when the dashboard runs in a browser.
pub const ADMIN_TOKEN_COOKIE: &str = "admin_token";

/// Raw tenant API key taken from the `x-api-key` header, whitespace-trimmed.
///
/// Returns 401 if the header is absent, not visible ASCII, or blank. Whether
/// the key belongs to a tenant is decided by the service, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyHeader(pub String);

impl<S> FromRequestParts<S> for ApiKeyHeader
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    // axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
    // Extract synchronously and return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = parts
            .headers
            .get(X_API_KEY)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned);

        async move { key.map(Self).ok_or(StatusCode::UNAUTHORIZED) }
    }
}

/// Admin credential from `Authorization` (raw or `Bearer <token>`) or, failing
/// that, the `admin_token` cookie.
///
/// Returns 401 if neither is present. Compare against the configured secret
/// with [`AdminToken::matches`].
#[derive(Clone, PartialEq, Eq)]
pub struct AdminToken(String);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Shared-secret comparison. An empty configured secret never matches.
    pub fn matches(&self, secret: &str) -> bool {
        !secret.is_empty() && self.0 == secret
    }
}

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken(***)")
    }
}

impl<S> FromRequestParts<S> for AdminToken
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let from_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.strip_prefix("Bearer ").unwrap_or(v).trim().to_owned())
            .filter(|s| !s.is_empty());

        let token = from_header.or_else(|| {
            CookieJar::from_headers(&parts.headers)
                .get(ADMIN_TOKEN_COOKIE)
                .map(|c| c.value().to_owned())
                .filter(|s| !s.is_empty())
        });

        async move { token.map(Self).ok_or(StatusCode::UNAUTHORIZED) }
    }
}
