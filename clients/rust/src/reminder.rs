use crate::base::{APIResponse, BaseClient};
use chime_api_structs::*;
use chime_domain::{Channel, Metadata, ReminderStatus, ReminderType, ID};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateReminderInput {
    pub user_id: i64,
    pub kind: Option<ReminderType>,
    pub target_id: Option<String>,
    pub trigger_at: DateTime<Utc>,
    pub message: String,
    pub channels: Vec<Channel>,
    pub metadata: Option<Metadata>,
}

pub struct CreateScheduleReminderInput {
    pub user_id: i64,
    pub schedule_id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub location: Option<String>,
    pub lead_minutes: Option<i64>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn create(&self, input: CreateReminderInput) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            kind: input.kind,
            target_id: input.target_id,
            trigger_at: input.trigger_at,
            message: input.message,
            channels: input.channels,
            metadata: input.metadata,
        };
        self.base
            .post(
                body,
                format!("user/{}/reminder", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn create_for_schedule(
        &self,
        input: CreateScheduleReminderInput,
    ) -> APIResponse<create_schedule_reminder::APIResponse> {
        let body = create_schedule_reminder::RequestBody {
            schedule_id: input.schedule_id,
            title: input.title,
            start_time: input.start_time,
            location: input.location,
            lead_minutes: input.lead_minutes,
        };
        self.base
            .post(
                body,
                format!("user/{}/reminder/schedule", input.user_id),
                StatusCode::CREATED,
            )
            .await
    }

    pub async fn get(&self, reminder_id: ID) -> APIResponse<get_reminder::APIResponse> {
        self.base
            .get(format!("reminder/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn get_by_user(
        &self,
        user_id: i64,
        status: Option<ReminderStatus>,
    ) -> APIResponse<get_user_reminders::APIResponse> {
        let path = match status {
            Some(status) => format!("user/{}/reminder?status={}", user_id, status),
            None => format!("user/{}/reminder", user_id),
        };
        self.base.get(path, StatusCode::OK).await
    }

    pub async fn cancel(&self, reminder_id: ID) -> APIResponse<cancel_reminder::APIResponse> {
        self.base
            .delete(format!("reminder/{}", reminder_id), StatusCode::OK)
            .await
    }

    pub async fn cancel_by_target(
        &self,
        target_id: &str,
    ) -> APIResponse<cancel_target_reminders::APIResponse> {
        self.base
            .delete(format!("reminder/target/{}", target_id), StatusCode::OK)
            .await
    }

    /// Delivers every due reminder right away
    pub async fn process_due(&self) -> APIResponse<process_due_reminders::APIResponse> {
        self.base
            .post((), "reminder/process".into(), StatusCode::OK)
            .await
    }
}
