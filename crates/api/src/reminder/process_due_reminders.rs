use super::worker::{Delivery, ReminderWorker, WorkerError};
use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::process_due_reminders::*;
use chime_infra::ChimeContext;
use futures::future::join_all;
use tracing::info;

pub async fn process_due_reminders_controller(
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    execute(ProcessDueRemindersUseCase {}, &ctx)
        .await
        .map(|res| HttpResponse::Ok().json(APIResponse { sent: res.sent }))
        .map_err(ChimeError::from)
}

/// Delivers every due reminder, at most `batch_size` of them per run,
/// through the retrying `ReminderWorker`.
///
/// Reminders already claimed by another run are left to that run, so a run
/// only ever waits for the retries of the reminders it claimed itself.
#[derive(Debug)]
pub struct ProcessDueRemindersUseCase {}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessedReminders {
    pub sent: usize,
    pub failed: usize,
}

#[derive(Debug)]
pub enum UseCaseError {
    /// Every due reminder was marked failed
    NotifierNotConfigured { failed: usize },
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotifierNotConfigured { failed } => Self::DeliveryUnavailable(format!(
                "no notifier is configured, {} due reminders were marked failed",
                failed
            )),
        }
    }
}

#[async_trait::async_trait]
impl UseCase for ProcessDueRemindersUseCase {
    type Response = ProcessedReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "ProcessDueReminders";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let now = ctx.sys.now();
        let due = ctx
            .repos
            .reminders
            .find_due(now)
            .await
            .into_iter()
            .filter_map(|r| ctx.in_flight.claim(&r.id).map(|claim| (r, claim)))
            .take(ctx.config.scheduler.batch_size)
            .collect::<Vec<_>>();
        if due.is_empty() {
            return Ok(ProcessedReminders::default());
        }

        let worker = ReminderWorker::from_context(ctx);
        let outcomes = join_all(due.iter().map(|(r, _)| worker.process_reminder(r))).await;

        let mut res = ProcessedReminders::default();
        let mut notifier_missing = false;
        for outcome in outcomes {
            match outcome {
                Ok(Delivery::Sent(_)) => res.sent += 1,
                Ok(Delivery::Skipped) => {}
                Err(WorkerError::NotifierNotConfigured(_)) => {
                    notifier_missing = true;
                    res.failed += 1;
                }
                Err(_) => res.failed += 1,
            }
        }

        if notifier_missing {
            return Err(UseCaseError::NotifierNotConfigured { failed: res.failed });
        }

        info!(
            "Processed {} due reminders: {} sent, {} failed",
            due.len(),
            res.sent,
            res.failed
        );
        Ok(res)
    }
}
