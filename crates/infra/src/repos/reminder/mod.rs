mod inmemory;

use chime_domain::{Reminder, ReminderStatus, ID};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryReminderRepo;

/// Storage for `Reminder`s. Lists are ordered by ascending `trigger_at`.
#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Fails if a reminder with the same id exists
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()>;
    /// Fails if the reminder does not exist
    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()>;
    async fn find(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn find_by_target(&self, target_id: &str) -> Vec<Reminder>;
    /// Pending reminders with `trigger_at <= before`
    async fn find_due(&self, before: DateTime<Utc>) -> Vec<Reminder>;
    /// `None` means every status
    async fn find_by_user(&self, user_id: i64, status: Option<ReminderStatus>) -> Vec<Reminder>;
    async fn delete(&self, reminder_id: &ID) -> Option<Reminder>;
    async fn mark_sent(&self, reminder_id: &ID, at: DateTime<Utc>) -> anyhow::Result<Reminder>;
    async fn mark_failed(&self, reminder_id: &ID, reason: &str) -> anyhow::Result<Reminder>;
    /// Atomically moves a pending reminder to cancelled
    async fn cancel(&self, reminder_id: &ID) -> anyhow::Result<Reminder>;
    /// Cancels every pending reminder of the target and returns them
    async fn cancel_by_target(&self, target_id: &str) -> Vec<Reminder>;
}
