//! SMTP delivery through lettre. A transport is built per call from the
//! tenant's own configuration; nothing is pooled across tenants.

use std::time::Duration;

use lettre::{
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, header::ContentType},
    transport::smtp::{
        self,
        authentication::Credentials,
        response::{Category, Code, Severity},
    },
};

use crate::domain::repository::MailPort;
use crate::domain::types::{MailConfig, OutboundMessage};
use crate::error::MailError;

/// Port for implicit TLS; every other port negotiates STARTTLS.
const IMPLICIT_TLS_PORT: u16 = 465;

#[derive(Clone)]
pub struct SmtpMailer {
    pub timeout: Duration,
}

impl SmtpMailer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn transport(
        &self,
        config: &MailConfig,
    ) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let (host, port) = config.endpoint().ok_or(MailError::NotConfigured)?;
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Err(MailError::NotConfigured);
        };

        let builder = if port == IMPLICIT_TLS_PORT {
            AsyncSmtpTransport::<Tokio1Executor>::relay(host)
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
        }
        .map_err(|e| MailError::InvalidConfiguration(e.to_string()))?;

        Ok(builder
            .port(port)
            .timeout(Some(self.timeout))
            .credentials(Credentials::new(username.clone(), password.clone()))
            .build())
    }
}

/// `"Sender Name" <username>`, or the bare username when no sender name is set.
pub fn from_mailbox(config: &MailConfig) -> Result<Mailbox, MailError> {
    let address = config
        .username
        .as_deref()
        .ok_or(MailError::NotConfigured)?
        .parse::<Address>()
        .map_err(|e| MailError::InvalidConfiguration(format!("invalid from address: {e}")))?;
    let name = config
        .sender_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned);
    Ok(Mailbox::new(name, address))
}

fn classify(e: smtp::Error) -> MailError {
    classify_reply(e.status(), e.is_client(), e.to_string())
}

/// Sort a failure by the server's reply code. Without a reply the socket or
/// TLS layer failed, unless lettre itself refused the request.
fn classify_reply(status: Option<Code>, client: bool, msg: String) -> MailError {
    match status {
        // 530/534/535: authentication required or credentials rejected.
        Some(Code {
            severity: Severity::PermanentNegativeCompletion,
            category: Category::Unspecified3,
            ..
        }) => MailError::Authentication(msg),
        // 421 and friends: service unavailable, closing the channel.
        Some(Code {
            category: Category::Connections,
            ..
        }) => MailError::Connection(msg),
        Some(_) => MailError::SendFailed(msg),
        None if client => MailError::SendFailed(msg),
        None => MailError::Connection(msg),
    }
}

impl MailPort for SmtpMailer {
    async fn send(&self, config: &MailConfig, message: &OutboundMessage) -> Result<(), MailError> {
        let from = from_mailbox(config)?;
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| MailError::SendFailed(format!("invalid recipient address: {e}")))?;

        let email = Message::builder()
            .from(from)
            .to(to)
            .subject(message.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(message.html_body.clone())
            .map_err(|e| MailError::SendFailed(e.to_string()))?;

        self.transport(config)?
            .send(email)
            .await
            .map(|_| ())
            .map_err(classify)
    }

    async fn verify_config(&self, config: &MailConfig) -> Result<(), MailError> {
        match self.transport(config)?.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(MailError::Connection(
                "server did not accept the connection".to_owned(),
            )),
            Err(e) => Err(classify(e)),
        }
    }
}
