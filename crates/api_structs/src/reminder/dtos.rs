use chime_domain::{Channel, Metadata, Reminder, ReminderStatus, ReminderType, ID};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: ReminderType,
    pub target_id: Option<String>,
    pub trigger_at: DateTime<Utc>,
    pub message: String,
    pub channels: Vec<Channel>,
    pub status: ReminderStatus,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub metadata: Metadata,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            user_id: reminder.user_id,
            kind: reminder.kind,
            target_id: reminder.target_id,
            trigger_at: reminder.trigger_at,
            message: reminder.message,
            channels: reminder.channels,
            status: reminder.status,
            created_at: reminder.created_at,
            sent_at: reminder.sent_at,
            metadata: reminder.metadata,
        }
    }
}
