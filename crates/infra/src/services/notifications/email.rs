use super::{IChannelSender, NotificationError};
use chime_domain::{Channel, Metadata};
use std::{collections::HashMap, fmt::Debug, sync::Arc};
use tracing::info;

#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
    pub from_name: String,
}

impl Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("from_address", &self.from_address)
            .field("from_name", &self.from_name)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Looks up the email address of a user
#[async_trait::async_trait]
pub trait IUserEmailResolver: Send + Sync {
    async fn email_for(&self, user_id: i64) -> Option<String>;
}

/// Transport for finished emails
#[async_trait::async_trait]
pub trait IMailer: Send + Sync {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), NotificationError>;
}

/// Fixed user → address table
#[derive(Default)]
pub struct StaticEmailResolver {
    addresses: HashMap<i64, String>,
}

impl StaticEmailResolver {
    pub fn new(addresses: HashMap<i64, String>) -> Self {
        Self { addresses }
    }
}

#[async_trait::async_trait]
impl IUserEmailResolver for StaticEmailResolver {
    async fn email_for(&self, user_id: i64) -> Option<String> {
        self.addresses.get(&user_id).cloned()
    }
}

/// Records outgoing mail in the logs instead of talking to an SMTP server
pub struct LogMailer {
    config: EmailConfig,
}

impl LogMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }
}

#[async_trait::async_trait]
impl IMailer for LogMailer {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<(), NotificationError> {
        info!(
            smtp_host = %self.config.smtp_host,
            smtp_port = self.config.smtp_port,
            to = %email.to,
            subject = %email.subject,
            "Sending reminder email"
        );
        Ok(())
    }
}

pub struct EmailSender {
    config: EmailConfig,
    resolver: Arc<dyn IUserEmailResolver>,
    mailer: Arc<dyn IMailer>,
}

impl EmailSender {
    pub fn new(config: EmailConfig, resolver: Arc<dyn IUserEmailResolver>, mailer: Arc<dyn IMailer>) -> Self {
        Self {
            config,
            resolver,
            mailer,
        }
    }

    fn from_header(&self) -> String {
        if self.config.from_name.is_empty() {
            self.config.from_address.clone()
        } else {
            format!("{} <{}>", self.config.from_name, self.config.from_address)
        }
    }
}

#[async_trait::async_trait]
impl IChannelSender for EmailSender {
    fn name(&self) -> Channel {
        Channel::email()
    }

    async fn send(&self, user_id: i64, message: &str, _metadata: &Metadata) -> Result<(), NotificationError> {
        let to = match self.resolver.email_for(user_id).await {
            Some(address) if !address.trim().is_empty() => address,
            _ => return Err(NotificationError::NoRecipient(user_id)),
        };

        let email = OutgoingEmail {
            from: self.from_header(),
            to,
            subject: "Reminder".into(),
            body: message.to_string(),
        };
        self.mailer.deliver(&email).await
    }
}
