use chime_domain::{DSTTransition, DSTTransitionType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DSTTransitionDTO {
    pub time: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: DSTTransitionType,
    pub from_offset: i32,
    pub to_offset: i32,
    pub zone_name: String,
    pub zone_name_new: String,
    pub description: String,
}

impl DSTTransitionDTO {
    pub fn new(transition: DSTTransition) -> Self {
        Self {
            description: transition.to_string(),
            time: transition.time.with_timezone(&Utc),
            kind: transition.kind,
            from_offset: transition.from_offset,
            to_offset: transition.to_offset,
            zone_name: transition.zone_name,
            zone_name_new: transition.zone_name_new,
        }
    }
}
