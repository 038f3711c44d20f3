// ABOUTME: Notification collaborator trait and its SMTP implementation.
// ABOUTME: Sends plain-text mail through an unauthenticated relay via lettre.

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::config::NotifyConfig;

/// A plain-text message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("invalid address {address:?}: {reason}")]
    Address { address: String, reason: String },

    #[error("failed to build message: {0}")]
    Message(String),

    #[error("failed to send mail: {0}")]
    Transport(String),
}

/// Delivers release notifications.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), NotifyError>;
}

/// Sends mail through an SMTP relay.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl std::fmt::Debug for SmtpNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpNotifier").finish_non_exhaustive()
    }
}

impl SmtpNotifier {
    pub fn new(host: &str, port: u16) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host)
            .port(port)
            .build();
        Self { transport }
    }

    pub fn from_config(config: &NotifyConfig) -> Self {
        Self::new(&config.smtp_host, config.smtp_port)
    }
}

/// Build the lettre message for `email`.
pub(crate) fn build_message(email: &Email) -> Result<Message, NotifyError> {
    let parse = |address: &str| {
        address
            .parse::<Mailbox>()
            .map_err(|e| NotifyError::Address {
                address: address.to_string(),
                reason: e.to_string(),
            })
    };

    Message::builder()
        .from(parse(&email.from)?)
        .to(parse(&email.to)?)
        .subject(email.subject.as_str())
        .header(ContentType::TEXT_PLAIN)
        .body(email.body.clone())
        .map_err(|e| NotifyError::Message(e.to_string()))
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send(&self, email: &Email) -> Result<(), NotifyError> {
        tracing::info!("Notifying {}...", email.to);
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        tracing::info!("Notification sent to {}", email.to);
        Ok(())
    }
}
