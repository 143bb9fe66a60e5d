use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerStatusDTO {
    pub running: bool,
    pub healthy: bool,
    pub total_processed: u64,
    pub total_failed: u64,
    pub check_count: u64,
    pub last_run_at: Option<DateTime<Utc>>,
}
