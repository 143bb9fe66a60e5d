use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::cancel_reminder::*;
use chime_domain::{Reminder, ReminderError, ID};
use chime_infra::{ChimeContext, RepoError};
use tracing::info;

pub async fn cancel_reminder_controller(
    path_params: web::Path<PathParams>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let usecase = CancelReminderUseCase {
        reminder_id: path_params.reminder_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Ok().json(APIResponse::new(reminder)))
        .map_err(ChimeError::from)
}

#[derive(Debug)]
pub struct CancelReminderUseCase {
    pub reminder_id: ID,
}

#[derive(Debug)]
pub enum UseCaseError {
    NotFound(ID),
    NotPending(ReminderError),
    Storage,
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(id) => {
                Self::NotFound(format!("The reminder with id: {}, was not found.", id))
            }
            UseCaseError::NotPending(e) => Self::Conflict(e.to_string()),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for CancelReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelReminder";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        match ctx.repos.reminders.cancel(&self.reminder_id).await {
            Ok(reminder) => {
                info!(reminder_id = %reminder.id, "Reminder cancelled");
                Ok(reminder)
            }
            Err(e) => {
                if let Some(e) = e.downcast_ref::<ReminderError>() {
                    Err(UseCaseError::NotPending(e.clone()))
                } else if let Some(RepoError::NotFound(_)) = e.downcast_ref::<RepoError>() {
                    Err(UseCaseError::NotFound(self.reminder_id.clone()))
                } else {
                    Err(UseCaseError::Storage)
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chime_domain::{Channel, ReminderStatus, ReminderType};
    use chime_infra::Config;
    use chrono::{Duration, Utc};

    #[actix_web::main]
    #[test]
    async fn cancels_only_pending_reminders() {
        let ctx = ChimeContext::create_inmemory(Config::default());
        let now = Utc::now();
        let reminder = Reminder::new(
            1,
            ReminderType::Smart,
            now + Duration::minutes(10),
            "Stretch".into(),
            vec![Channel::app()],
            now,
        );
        ctx.repos.reminders.insert(&reminder).await.unwrap();

        let mut usecase = CancelReminderUseCase {
            reminder_id: reminder.id.clone(),
        };
        let cancelled = usecase.execute(&ctx).await.unwrap();
        assert_eq!(cancelled.status, ReminderStatus::Cancelled);

        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::NotPending(_))));
        assert_eq!(
            ctx.repos.reminders.find(&reminder.id).await.unwrap().status,
            ReminderStatus::Cancelled
        );
    }

    #[actix_web::main]
    #[test]
    async fn unknown_reminder_is_not_found() {
        let ctx = ChimeContext::create_inmemory(Config::default());
        let mut usecase = CancelReminderUseCase {
            reminder_id: ID::default(),
        };
        assert!(matches!(
            usecase.execute(&ctx).await,
            Err(UseCaseError::NotFound(_))
        ));
    }
}
