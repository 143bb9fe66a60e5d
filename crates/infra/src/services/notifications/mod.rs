mod app;
mod dispatcher;
mod email;
mod mock;
mod webhook;

pub use app::AppNotificationSender;
pub use dispatcher::NotificationDispatcher;
pub use email::{EmailConfig, EmailSender, IMailer, IUserEmailResolver, LogMailer, OutgoingEmail, StaticEmailResolver};
pub use mock::{MockNotifier, SentNotification};
pub use webhook::{WebhookConfig, WebhookPayload, WebhookSender, WEBHOOK_EVENT, WEBHOOK_SECRET_HEADER};

use chime_domain::{Channel, Metadata};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("channel not registered: {0}")]
    ChannelNotRegistered(Channel),
    #[error("no email address on file for user {0}")]
    NoRecipient(i64),
    #[error("webhook responded with status {0}")]
    WebhookStatus(u16),
    #[error("webhook request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{0}")]
    Rejected(String),
}

/// A delivery transport registered in the `NotificationDispatcher`
#[async_trait::async_trait]
pub trait IChannelSender: Send + Sync {
    fn name(&self) -> Channel;

    async fn send(&self, user_id: i64, message: &str, metadata: &Metadata) -> Result<(), NotificationError>;
}

/// Delivers a message to a user over a single channel
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn send(&self, user_id: i64, channel: &Channel, message: &str) -> Result<(), NotificationError>;

    async fn send_with_metadata(
        &self,
        user_id: i64,
        channel: &Channel,
        message: &str,
        _metadata: &Metadata,
    ) -> Result<(), NotificationError> {
        self.send(user_id, channel, message).await
    }
}
