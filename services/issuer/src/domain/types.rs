use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An onboarded system. Resolved from its API key on every integration call.
#[derive(Debug, Clone)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub api_key: String,
    pub mail: MailConfig,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// How a tenant's mail leaves the building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailTransport {
    /// Explicit SMTP relay: host, port and credentials are all required.
    Smtp,
    /// Gmail SMTP; only credentials are required.
    #[default]
    Gmail,
}

impl MailTransport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Smtp => "smtp",
            Self::Gmail => "gmail",
        }
    }
}

impl FromStr for MailTransport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smtp" => Ok(Self::Smtp),
            "gmail" => Ok(Self::Gmail),
            other => Err(format!("unknown mail transport: {other}")),
        }
    }
}

/// Outbound mail settings for one tenant. Every field is optional at rest so
/// a freshly created tenant can exist before its mail account is set up.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MailConfig {
    pub transport: MailTransport,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub sender_name: Option<String>,
    pub sender_picture: Option<String>,
}

impl MailConfig {
    /// Names of the fields the configured transport needs but doesn't have.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        fn blank(v: &Option<String>) -> bool {
            v.as_deref().is_none_or(|s| s.trim().is_empty())
        }

        let mut missing = Vec::new();
        if self.transport == MailTransport::Smtp {
            if blank(&self.host) {
                missing.push("smtp_host");
            }
            if self.port.is_none() {
                missing.push("smtp_port");
            }
        }
        if blank(&self.username) {
            missing.push("smtp_username");
        }
        if blank(&self.password) {
            missing.push("smtp_password");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Host and port to connect to. Gmail is pinned to its implicit-TLS relay.
    pub fn endpoint(&self) -> Option<(&str, u16)> {
        match self.transport {
            MailTransport::Gmail => Some((GMAIL_SMTP_HOST, GMAIL_SMTP_PORT)),
            MailTransport::Smtp => Some((self.host.as_deref()?, self.port?)),
        }
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("transport", &self.transport)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("sender_name", &self.sender_name)
            .field("sender_picture", &self.sender_picture)
            .finish()
    }
}

/// Subject/body pair owned by one tenant.
#[derive(Debug, Clone)]
pub struct Template {
    pub tenant_id: Uuid,
    pub id: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One issued passcode.
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub recipient: String,
    pub code: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub consumed_at: Option<DateTime<Utc>>,
}

impl OtpRecord {
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// A record is usable up to and including its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Result of presenting a code to the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    Valid,
    Invalid,
    Expired,
}

/// Rendered message handed to the mail capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// OTP length in digits.
pub const OTP_LEN: usize = 6;

/// OTP time-to-live in seconds.
pub const OTP_TTL_SECS: i64 = 300;

/// Prefix that makes tenant API keys recognizable in logs and configs.
pub const API_KEY_PREFIX: &str = "sk_";

/// Number of OTP records shown on a tenant dashboard.
pub const DASHBOARD_RECENT_OTPS: u64 = 50;

/// Value of the `user` template field when the caller supplies no name.
pub const DEFAULT_FRIENDLY_NAME: &str = "Valued User";

pub const GMAIL_SMTP_HOST: &str = "smtp.gmail.com";
pub const GMAIL_SMTP_PORT: u16 = 465;
