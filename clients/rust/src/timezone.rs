use crate::base::{APIResponse, BaseClient};
use chime_api_structs::*;
use chime_domain::Tz;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct TimezoneClient {
    base: Arc<BaseClient>,
}

pub struct ValidateLocalTimeInput {
    pub timezone: Tz,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

impl TimezoneClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn dst_transitions(
        &self,
        timezone: Tz,
        start_ts: i64,
        end_ts: i64,
    ) -> APIResponse<get_dst_transitions::APIResponse> {
        self.base
            .get(
                format!(
                    "timezone/transitions?timezone={}&startTs={}&endTs={}",
                    timezone.name(),
                    start_ts,
                    end_ts
                ),
                StatusCode::OK,
            )
            .await
    }

    pub async fn validate_local_time(
        &self,
        input: ValidateLocalTimeInput,
    ) -> APIResponse<validate_local_time::APIResponse> {
        let body = validate_local_time::RequestBody {
            timezone: input.timezone.name().to_string(),
            year: input.year,
            month: input.month,
            day: input.day,
            hour: input.hour,
            minute: input.minute,
        };
        self.base
            .post(body, "timezone/validate".into(), StatusCode::OK)
            .await
    }
}
