mod inmemory;

use chime_domain::{AppNotification, ID};
pub use inmemory::InMemoryAppNotificationRepo;

#[async_trait::async_trait]
pub trait IAppNotificationRepo: Send + Sync {
    async fn insert(&self, notification: &AppNotification) -> anyhow::Result<()>;
    /// Newest first
    async fn find_by_user(&self, user_id: i64) -> Vec<AppNotification>;
    async fn mark_read(&self, notification_id: &ID) -> anyhow::Result<AppNotification>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chime_domain::Metadata;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn stores_and_reads_notifications() {
        let repo = InMemoryAppNotificationRepo::new();
        let now = Utc::now();
        let older = AppNotification::reminder(7, "first".into(), Metadata::new(), now - Duration::minutes(1));
        let newer = AppNotification::reminder(7, "second".into(), Metadata::new(), now);
        repo.insert(&older).await.unwrap();
        repo.insert(&newer).await.unwrap();

        let inbox = repo.find_by_user(7).await;
        assert_eq!(inbox.len(), 2);
        assert_eq!(inbox[0].message, "second");
        assert!(inbox.iter().all(|n| !n.read && n.kind == "reminder"));

        let read = repo.mark_read(&older.id).await.unwrap();
        assert!(read.read);
        assert!(repo.find_by_user(8).await.is_empty());
        assert!(repo.mark_read(&ID::new()).await.is_err());
    }
}
