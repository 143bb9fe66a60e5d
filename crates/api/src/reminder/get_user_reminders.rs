use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::get_user_reminders::*;
use chime_domain::{Reminder, ReminderStatus};
use chime_infra::ChimeContext;

pub async fn get_user_reminders_controller(
    path_params: web::Path<PathParams>,
    query_params: web::Query<QueryParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let status = match query_params.0.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<ReminderStatus>().map_err(|e| {
            ChimeError::BadClientData(format!("Invalid status filter: {}", e))
        })?),
    };

    let usecase = GetUserRemindersUseCase {
        user_id: path_params.user_id,
        status,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(|_| ChimeError::InternalError)
}

/// Reminders of a user ordered by trigger time. No status means every status.
#[derive(Debug)]
pub struct GetUserRemindersUseCase {
    pub user_id: i64,
    pub status: Option<ReminderStatus>,
}

#[async_trait::async_trait]
impl UseCase for GetUserRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = ();

    const NAME: &'static str = "GetUserReminders";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        Ok(ctx
            .repos
            .reminders
            .find_by_user(self.user_id, self.status)
            .await)
    }
}
