mod app_notification;
mod reminder;
mod shared;

pub use app_notification::{IAppNotificationRepo, InMemoryAppNotificationRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo};
pub use shared::repo::RepoError;
use std::sync::Arc;

#[derive(Clone)]
pub struct Repos {
    pub reminders: Arc<dyn IReminderRepo>,
    pub app_notifications: Arc<dyn IAppNotificationRepo>,
}

impl Repos {
    pub fn create_inmemory() -> Self {
        Self {
            reminders: Arc::new(InMemoryReminderRepo::new()),
            app_notifications: Arc::new(InMemoryAppNotificationRepo::new()),
        }
    }
}
