use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learned time-of-day preferences of a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeHabits {
    /// Most active hours of the day (0-23)
    pub active_hours: Vec<u32>,
    /// E.g. "09:00"
    pub preferred_times: Vec<String>,
    pub reminder_lead_min: i64,
    pub weekday_pattern: bool,
}

impl Default for TimeHabits {
    fn default() -> Self {
        Self {
            active_hours: vec![9, 10, 14, 15, 16],
            preferred_times: vec!["09:00".into(), "14:00".into()],
            reminder_lead_min: 15,
            weekday_pattern: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHabits {
    pub user_id: i64,
    pub time: Option<TimeHabits>,
    pub updated_at: DateTime<Utc>,
}
