use std::collections::HashMap;

/// Open key/value bag attached to a `Reminder`
pub type Metadata = HashMap<String, String>;

pub mod keys {
    pub const SCHEDULE_TITLE: &str = "schedule_title";
    pub const LEAD_MINUTES: &str = "lead_minutes";
    pub const FAILURE_REASON: &str = "failure_reason";
    pub const REMINDER_ID: &str = "reminder_id";
}
