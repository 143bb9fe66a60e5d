use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use chime_domain::{Reminder, ReminderStatus, ID};
use chrono::{DateTime, Utc};
use std::sync::RwLock;

pub struct InMemoryReminderRepo {
    reminders: RwLock<Vec<Reminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: RwLock::new(Vec::new()),
        }
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

/// Stable, so reminders sharing a trigger keep insertion order
fn by_trigger(mut reminders: Vec<Reminder>) -> Vec<Reminder> {
    reminders.sort_by_key(|r| r.trigger_at);
    reminders
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        insert(reminder, &self.reminders)
    }

    async fn save(&self, reminder: &Reminder) -> anyhow::Result<()> {
        save(reminder, &self.reminders)
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        find(reminder_id, &self.reminders)
    }

    async fn find_by_target(&self, target_id: &str) -> Vec<Reminder> {
        by_trigger(find_by(&self.reminders, |r| r.targets(target_id)))
    }

    async fn find_due(&self, before: DateTime<Utc>) -> Vec<Reminder> {
        by_trigger(find_by(&self.reminders, |r| r.is_due(&before)))
    }

    async fn find_by_user(&self, user_id: i64, status: Option<ReminderStatus>) -> Vec<Reminder> {
        by_trigger(find_by(&self.reminders, |r| {
            r.user_id == user_id && status.map(|s| r.status == s).unwrap_or(true)
        }))
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        delete(reminder_id, &self.reminders)
    }

    async fn mark_sent(&self, reminder_id: &ID, at: DateTime<Utc>) -> anyhow::Result<Reminder> {
        update(reminder_id, &self.reminders, |r| Ok(r.mark_sent(at)?))
    }

    async fn mark_failed(&self, reminder_id: &ID, reason: &str) -> anyhow::Result<Reminder> {
        update(reminder_id, &self.reminders, |r| Ok(r.mark_failed(reason)?))
    }

    async fn cancel(&self, reminder_id: &ID) -> anyhow::Result<Reminder> {
        update(reminder_id, &self.reminders, |r| Ok(r.cancel()?))
    }

    async fn cancel_by_target(&self, target_id: &str) -> Vec<Reminder> {
        by_trigger(update_many(
            &self.reminders,
            |r| r.targets(target_id) && r.status == ReminderStatus::Pending,
            |r| r.cancel().is_ok(),
        ))
    }
}
