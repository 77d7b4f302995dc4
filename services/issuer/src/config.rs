use std::time::Duration;

use serde::Deserialize;

use otpgate_core::config::Config;

/// Issuer service configuration loaded from environment variables.
#[derive(Debug, Deserialize)]
pub struct IssuerConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Shared secret for the admin endpoints. Env var: `ADMIN_TOKEN`.
    pub admin_token: String,
    /// TCP port to listen on (default 3000). Env var: `ISSUER_PORT`.
    #[serde(default = "default_issuer_port")]
    pub issuer_port: u16,
    /// SMTP connect/command timeout in seconds (default 10). Env var: `MAIL_TIMEOUT_SECS`.
    #[serde(default = "default_mail_timeout_secs")]
    pub mail_timeout_secs: u64,
}

fn default_issuer_port() -> u16 {
    3000
}

fn default_mail_timeout_secs() -> u64 {
    10
}

impl Config for IssuerConfig {}

impl IssuerConfig {
    pub fn mail_timeout(&self) -> Duration {
        Duration::from_secs(self.mail_timeout_secs)
    }
}
