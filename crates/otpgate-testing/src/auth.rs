//! Credential headers for router-level tests.
//!
//! Integration callers send `x-api-key`; administrators send `Authorization`.
//! `MockCredentials` builds those headers so tests don't hand-assemble them.

use axum::http::{HeaderMap, HeaderName, HeaderValue, header::AUTHORIZATION};

use otpgate_auth_types::credentials::X_API_KEY;

/// Credentials attached to a test request.
pub enum MockCredentials {
    ApiKey(String),
    Admin(String),
}

impl MockCredentials {
    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    pub fn admin(token: impl Into<String>) -> Self {
        Self::Admin(token.into())
    }

    /// Return the single header carrying this credential.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        match self {
            Self::ApiKey(key) => (
                HeaderName::from_static(X_API_KEY),
                HeaderValue::from_str(key).unwrap(),
            ),
            Self::Admin(token) => (
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
            ),
        }
    }

    /// Return the credential as a header map.
    pub fn headers(&self) -> HeaderMap {
        let (name, value) = self.header();
        let mut map = HeaderMap::new();
        map.insert(name, value);
        map
    }
}
