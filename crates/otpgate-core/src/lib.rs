//! Service plumbing shared by otpgate binaries: configuration loading,
//! tracing setup, health/status handlers and HTTP middleware layers.

pub mod config;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
