use chime_domain::{Channel, Reminder, ReminderError, ReminderStatus, ID};
use chime_infra::{notifications::INotifier, ChimeContext, IReminderRepo, ISys, RepoError};
use std::{sync::Arc, time::Duration};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

pub const NOTIFIER_NOT_CONFIGURED: &str = "notifier not configured";

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("reminder {0} could not be delivered: notifier not configured")]
    NotifierNotConfigured(ID),
    #[error("reminder {id} failed after {attempts} attempts: {reason}")]
    DeliveryFailed { id: ID, attempts: u32, reason: String },
    #[error("unable to store delivery outcome: {0}")]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Delivery {
    Sent(Reminder),
    /// The reminder left `pending` before it could be delivered
    Skipped,
}

/// Delivers reminders with a bounded, fixed-delay retry policy.
///
/// Every attempt re-reads the reminder from storage and only resends the
/// channels that have not succeeded yet.
pub struct ReminderWorker {
    reminders: Arc<dyn IReminderRepo>,
    notifier: Option<Arc<dyn INotifier>>,
    sys: Arc<dyn ISys>,
    max_retries: u32,
    retry_delay: Duration,
}

impl ReminderWorker {
    pub fn new(
        reminders: Arc<dyn IReminderRepo>,
        notifier: Option<Arc<dyn INotifier>>,
        sys: Arc<dyn ISys>,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Self {
        Self {
            reminders,
            notifier,
            sys,
            max_retries,
            retry_delay,
        }
    }

    pub fn from_context(ctx: &ChimeContext) -> Self {
        Self::new(
            ctx.repos.reminders.clone(),
            ctx.notifier.clone(),
            ctx.sys.clone(),
            ctx.config.scheduler.max_retries,
            ctx.config.scheduler.retry_delay,
        )
    }

    pub async fn process_reminder(&self, reminder: &Reminder) -> Result<Delivery, WorkerError> {
        let notifier = match &self.notifier {
            Some(notifier) => notifier,
            None => {
                return match self.reminders.mark_failed(&reminder.id, NOTIFIER_NOT_CONFIGURED).await {
                    Ok(_) => Err(WorkerError::NotifierNotConfigured(reminder.id.clone())),
                    Err(e) if left_pending(&e) => Ok(Delivery::Skipped),
                    Err(e) => Err(e.into()),
                };
            }
        };

        let attempts = self.max_retries + 1;
        let mut remaining: Vec<Channel> = reminder.channels.clone();
        let mut last_error = String::new();

        for attempt in 0..attempts {
            if attempt > 0 {
                warn!(
                    reminder_id = %reminder.id,
                    "Delivery attempt {} of {} failed: {}. Retrying in {:?}",
                    attempt,
                    attempts,
                    last_error,
                    self.retry_delay
                );
                tokio::time::sleep(self.retry_delay).await;
            }

            let current = match self.reminders.find(&reminder.id).await {
                Some(current) if current.status == ReminderStatus::Pending => current,
                Some(current) => {
                    info!(
                        reminder_id = %reminder.id,
                        "Reminder is {} and will not be delivered",
                        current.status
                    );
                    return Ok(Delivery::Skipped);
                }
                None => {
                    info!(reminder_id = %reminder.id, "Reminder no longer exists");
                    return Ok(Delivery::Skipped);
                }
            };

            let mut failing = Vec::new();
            for channel in &remaining {
                if let Err(e) = notifier
                    .send_with_metadata(current.user_id, channel, &current.message, &current.metadata)
                    .await
                {
                    last_error = format!("{}: {}", channel, e);
                    failing.push(channel.clone());
                }
            }

            if failing.is_empty() {
                return match self.reminders.mark_sent(&reminder.id, self.sys.now()).await {
                    Ok(sent) => {
                        info!(reminder_id = %sent.id, user_id = sent.user_id, "Reminder sent");
                        Ok(Delivery::Sent(sent))
                    }
                    Err(e) if left_pending(&e) => {
                        info!(reminder_id = %reminder.id, "Reminder changed during delivery: {}", e);
                        Ok(Delivery::Skipped)
                    }
                    Err(e) => Err(e.into()),
                };
            }
            remaining = failing;
        }

        if let Err(e) = self.reminders.mark_failed(&reminder.id, &last_error).await {
            if left_pending(&e) {
                info!(reminder_id = %reminder.id, "Reminder changed during delivery: {}", e);
                return Ok(Delivery::Skipped);
            }
            return Err(e.into());
        }
        Err(WorkerError::DeliveryFailed {
            id: reminder.id.clone(),
            attempts,
            reason: last_error,
        })
    }

    /// Processes `reminders` one after the other. Cancellation is checked
    /// between reminders and never interrupts a delivery in progress.
    ///
    /// Returns `(processed, failed)`.
    pub async fn process_batch(
        &self,
        reminders: &[Reminder],
        cancel: &CancellationToken,
    ) -> (usize, usize) {
        let mut processed = 0;
        let mut failed = 0;

        for reminder in reminders {
            if cancel.is_cancelled() {
                info!("Batch cancelled after {} reminders", processed + failed);
                break;
            }
            match self.process_reminder(reminder).await {
                Ok(Delivery::Sent(_)) => processed += 1,
                Ok(Delivery::Skipped) => {}
                Err(e) => {
                    error!("{}", e);
                    failed += 1;
                }
            }
        }

        (processed, failed)
    }
}

/// The reminder was cancelled, settled or deleted by someone else
fn left_pending(e: &anyhow::Error) -> bool {
    e.downcast_ref::<ReminderError>().is_some()
        || matches!(e.downcast_ref::<RepoError>(), Some(RepoError::NotFound(_)))
}
