use crate::base::{APIResponse, BaseClient};
use chime_api_structs::*;
use chime_domain::{RecurrenceRule, Tz};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ScheduleClient {
    base: Arc<BaseClient>,
}

pub struct PreviewBatchInput {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub duration: i64,
    pub location: Option<String>,
    pub recurrence: RecurrenceRule,
    pub end_date: Option<DateTime<Utc>>,
    pub count: usize,
    pub timezone: Option<Tz>,
}

impl ScheduleClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn preview_batch(
        &self,
        input: PreviewBatchInput,
    ) -> APIResponse<preview_batch_schedules::APIResponse> {
        let body = preview_batch_schedules::RequestBody {
            title: input.title,
            start_time: input.start_time,
            duration: input.duration,
            location: input.location,
            recurrence: input.recurrence,
            end_date: input.end_date,
            count: input.count,
            timezone: input.timezone.map(|tz| tz.name().to_string()),
        };
        self.base
            .post(body, "schedule/batch".into(), StatusCode::OK)
            .await
    }
}
