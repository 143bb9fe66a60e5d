use crate::dtos::DSTTransitionDTO;
use serde::{Deserialize, Serialize};

pub mod get_dst_transitions {
    use super::*;
    use chime_domain::DSTTransition;

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        pub timezone: String,
        /// Unix seconds
        pub start_ts: i64,
        pub end_ts: i64,
    }

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub timezone: String,
        pub transitions: Vec<DSTTransitionDTO>,
    }

    impl APIResponse {
        pub fn new(timezone: String, transitions: Vec<DSTTransition>) -> Self {
            Self {
                timezone,
                transitions: transitions.into_iter().map(DSTTransitionDTO::new).collect(),
            }
        }
    }
}

pub mod validate_local_time {
    use super::*;
    use chime_domain::ValidationResult;
    use chrono::{DateTime, Utc};

    #[derive(Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub timezone: String,
        pub year: i32,
        pub month: u32,
        pub day: u32,
        pub hour: u32,
        pub minute: u32,
    }

    #[derive(Debug, Deserialize, Serialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub valid_time: DateTime<Utc>,
        /// Wall-clock rendering in the requested zone
        pub local_time: String,
        pub warnings: Vec<String>,
        pub is_valid: bool,
    }

    impl APIResponse {
        pub fn new(res: ValidationResult) -> Self {
            Self {
                valid_time: res.valid_time.with_timezone(&Utc),
                local_time: res.valid_time.to_rfc3339(),
                warnings: res.warnings,
                is_valid: res.is_valid,
            }
        }
    }
}
