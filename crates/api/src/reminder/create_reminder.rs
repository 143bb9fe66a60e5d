use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::create_reminder::*;
use chime_domain::{CreateReminderRequest, Reminder, ReminderType};
use chime_infra::ChimeContext;
use chrono::{DateTime, Utc};
use tracing::info;

pub async fn create_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let body = body.0;
    let usecase = CreateReminderUseCase {
        user_id: path_params.user_id,
        request: CreateReminderRequest {
            kind: body.kind.unwrap_or(ReminderType::Smart),
            target_id: body.target_id,
            trigger_at: body.trigger_at,
            message: body.message,
            channels: body.channels,
            metadata: body.metadata.unwrap_or_default(),
        },
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(ChimeError::from)
}

#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub user_id: i64,
    pub request: CreateReminderRequest,
}

#[derive(Debug)]
pub enum UseCaseError {
    EmptyMessage,
    TriggerInPast(DateTime<Utc>),
    Storage,
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::EmptyMessage => {
                Self::BadClientData("A reminder needs a non-empty message.".into())
            }
            UseCaseError::TriggerInPast(at) => Self::BadClientData(format!(
                "The reminder would trigger at {}, which is in the past.",
                at.to_rfc3339()
            )),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let message = self.request.message.trim();
        if message.is_empty() {
            return Err(UseCaseError::EmptyMessage);
        }

        let now = ctx.sys.now();
        if self.request.trigger_at <= now {
            return Err(UseCaseError::TriggerInPast(self.request.trigger_at));
        }

        let channels = if self.request.channels.is_empty() {
            ctx.config.default_channels.clone()
        } else {
            self.request.channels.clone()
        };

        let mut reminder = Reminder::new(
            self.user_id,
            self.request.kind,
            self.request.trigger_at,
            message.to_string(),
            channels,
            now,
        );
        reminder.target_id = self
            .request
            .target_id
            .clone()
            .filter(|target| !target.is_empty());
        reminder.metadata = self.request.metadata.clone();

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        info!(reminder_id = %reminder.id, "Reminder of type {:?} created", reminder.kind);
        Ok(reminder)
    }
}
