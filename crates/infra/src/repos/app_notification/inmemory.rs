use super::IAppNotificationRepo;
use crate::repos::shared::inmemory_repo::*;
use chime_domain::{AppNotification, ID};
use std::sync::RwLock;

pub struct InMemoryAppNotificationRepo {
    notifications: RwLock<Vec<AppNotification>>,
}

impl InMemoryAppNotificationRepo {
    pub fn new() -> Self {
        Self {
            notifications: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryAppNotificationRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IAppNotificationRepo for InMemoryAppNotificationRepo {
    async fn insert(&self, notification: &AppNotification) -> anyhow::Result<()> {
        insert(notification, &self.notifications)
    }

    async fn find_by_user(&self, user_id: i64) -> Vec<AppNotification> {
        let mut notifications = find_by(&self.notifications, |n| n.user_id == user_id);
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        notifications
    }

    async fn mark_read(&self, notification_id: &ID) -> anyhow::Result<AppNotification> {
        update(notification_id, &self.notifications, |n| {
            n.read = true;
            Ok(())
        })
    }
}
