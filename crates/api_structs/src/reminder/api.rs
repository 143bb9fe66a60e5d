use crate::dtos::ReminderDTO;
use chime_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReminderResponse {
    pub reminder: ReminderDTO,
}

impl ReminderResponse {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            reminder: ReminderDTO::new(reminder),
        }
    }
}

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemindersResponse {
    pub reminders: Vec<ReminderDTO>,
}

impl RemindersResponse {
    pub fn new(reminders: Vec<Reminder>) -> Self {
        Self {
            reminders: reminders.into_iter().map(ReminderDTO::new).collect(),
        }
    }
}

pub mod create_reminder {
    use super::*;
    use chime_domain::{Channel, Metadata, ReminderType};
    use chrono::{DateTime, Utc};

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: i64,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(rename = "type")]
        pub kind: Option<ReminderType>,
        pub target_id: Option<String>,
        pub trigger_at: DateTime<Utc>,
        pub message: String,
        #[serde(default)]
        pub channels: Vec<Channel>,
        pub metadata: Option<Metadata>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod create_schedule_reminder {
    use super::*;
    use chrono::{DateTime, Utc};

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: i64,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub schedule_id: String,
        pub title: String,
        pub start_time: DateTime<Utc>,
        pub location: Option<String>,
        /// Zero or unset uses the server default
        pub lead_minutes: Option<i64>,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod get_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod cancel_reminder {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub reminder_id: ID,
    }

    pub type APIResponse = ReminderResponse;
}

pub mod cancel_target_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub target_id: String,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        /// Number of pending reminders that were cancelled
        pub cancelled: usize,
    }
}

pub mod get_user_reminders {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub user_id: i64,
    }

    #[derive(Deserialize, Serialize)]
    pub struct QueryParams {
        pub status: Option<String>,
    }

    pub type APIResponse = RemindersResponse;
}

pub mod process_due_reminders {
    use super::*;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub sent: usize,
    }
}
