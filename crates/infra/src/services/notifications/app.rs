use super::{IChannelSender, NotificationError};
use crate::{repos::IAppNotificationRepo, system::ISys};
use chime_domain::{AppNotification, Channel, Metadata};
use std::sync::Arc;

/// Writes reminders into the user's in-app inbox
pub struct AppNotificationSender {
    notifications: Arc<dyn IAppNotificationRepo>,
    sys: Arc<dyn ISys>,
}

impl AppNotificationSender {
    pub fn new(notifications: Arc<dyn IAppNotificationRepo>, sys: Arc<dyn ISys>) -> Self {
        Self { notifications, sys }
    }
}

#[async_trait::async_trait]
impl IChannelSender for AppNotificationSender {
    fn name(&self) -> Channel {
        Channel::app()
    }

    async fn send(&self, user_id: i64, message: &str, metadata: &Metadata) -> Result<(), NotificationError> {
        let notification = AppNotification::reminder(user_id, message.to_string(), metadata.clone(), self.sys.now());
        self.notifications
            .insert(&notification)
            .await
            .map_err(|e| NotificationError::Rejected(format!("failed to store app notification: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{repos::InMemoryAppNotificationRepo, system::RealSys};

    #[tokio::test]
    async fn writes_an_unread_inbox_entry() {
        let repo = Arc::new(InMemoryAppNotificationRepo::new());
        let sender = AppNotificationSender::new(repo.clone(), Arc::new(RealSys {}));
        let mut metadata = Metadata::new();
        metadata.insert("reminder_id".into(), "abc".into());

        sender.send(5, "Standup in 10 minutes", &metadata).await.unwrap();

        let inbox = repo.find_by_user(5).await;
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].message, "Standup in 10 minutes");
        assert_eq!(inbox[0].title, "Reminder");
        assert_eq!(inbox[0].metadata.get("reminder_id").map(|v| v.as_str()), Some("abc"));
        assert!(!inbox[0].read);
    }
}
