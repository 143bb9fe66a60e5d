use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::cancel_target_reminders::*;
use chime_domain::Reminder;
use chime_infra::ChimeContext;
use tracing::info;

pub async fn cancel_target_reminders_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let usecase = CancelTargetRemindersUseCase {
        target_id: path_params.into_inner().target_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|cancelled| {
            HttpResponse::Ok().json(APIResponse {
                cancelled: cancelled.len(),
            })
        })
        .map_err(|_| ChimeError::InternalError)
}

/// Cancels every pending reminder produced by a schedule or todo.
/// Terminal reminders of the target are left untouched.
#[derive(Debug)]
pub struct CancelTargetRemindersUseCase {
    pub target_id: String,
}

#[async_trait::async_trait]
impl UseCase for CancelTargetRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = ();

    const NAME: &'static str = "CancelTargetReminders";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let cancelled = ctx.repos.reminders.cancel_by_target(&self.target_id).await;
        if !cancelled.is_empty() {
            info!(
                target_id = %self.target_id,
                "Cancelled {} pending reminders",
                cancelled.len()
            );
        }
        Ok(cancelled)
    }
}
