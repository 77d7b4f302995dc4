//! Caller credential types shared by otpgate services.
//!
//! Provides the `ApiKeyHeader` and `AdminToken` axum extractors.

pub mod credentials;
