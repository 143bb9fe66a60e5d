use crate::dtos::ScheduleRequestDTO;
use chime_domain::ScheduleRequest;
use serde::{Deserialize, Serialize};

pub mod preview_batch_schedules {
    use super::*;
    use chime_domain::RecurrenceRule;
    use chrono::{DateTime, Utc};

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub title: String,
        pub start_time: DateTime<Utc>,
        /// Minutes, defaults to 60 when unset
        #[serde(default)]
        pub duration: i64,
        pub location: Option<String>,
        pub recurrence: RecurrenceRule,
        pub end_date: Option<DateTime<Utc>>,
        /// Defaults to 12, capped at 52
        #[serde(default)]
        pub count: usize,
        /// IANA name used to expand local wall-clock times, server default when unset
        pub timezone: Option<String>,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub schedules: Vec<ScheduleRequestDTO>,
        pub total_count: usize,
    }

    impl APIResponse {
        pub fn new(schedules: Vec<ScheduleRequest>) -> Self {
            let schedules: Vec<_> = schedules.into_iter().map(ScheduleRequestDTO::new).collect();
            Self {
                total_count: schedules.len(),
                schedules,
            }
        }
    }
}
