use chime_domain::ScheduleRequest;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequestDTO {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Minutes
    pub duration: i64,
    pub location: Option<String>,
}

impl ScheduleRequestDTO {
    pub fn new(schedule: ScheduleRequest) -> Self {
        Self {
            title: schedule.title,
            start_time: schedule.start_time,
            end_time: schedule.end_time,
            duration: schedule.duration,
            location: schedule.location,
        }
    }
}
