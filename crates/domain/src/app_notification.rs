use crate::shared::{
    entity::{Entity, ID},
    metadata::Metadata,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// In-app inbox entry written by the `app` channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppNotification {
    pub id: ID,
    pub user_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub metadata: Metadata,
}

impl AppNotification {
    pub fn reminder(user_id: i64, message: String, metadata: Metadata, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ID::new(),
            user_id,
            kind: "reminder".into(),
            title: "Reminder".into(),
            message,
            read: false,
            created_at,
            metadata,
        }
    }
}

impl Entity for AppNotification {
    fn id(&self) -> &ID {
        &self.id
    }
}
