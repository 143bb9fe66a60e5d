use crate::error::ChimeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chime_api_structs::create_schedule_reminder::*;
use chime_domain::{metadata_keys, Reminder, ReminderType, ScheduleInfo};
use chime_infra::ChimeContext;
use chrono::{DateTime, Duration, Utc};
use tracing::{info, warn};

pub async fn create_schedule_reminder_controller(
    path_params: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ChimeContext>,
) -> Result<HttpResponse, ChimeError> {
    let body = body.0;
    let usecase = CreateScheduleReminderUseCase {
        user_id: path_params.user_id,
        schedule: ScheduleInfo {
            id: body.schedule_id,
            title: body.title,
            start_time: body.start_time,
            location: body.location,
        },
        lead_minutes: body.lead_minutes.unwrap_or(0),
    };

    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(ChimeError::from)
}

#[derive(Debug)]
pub struct CreateScheduleReminderUseCase {
    pub user_id: i64,
    pub schedule: ScheduleInfo,
    /// Zero or less uses the configured default
    pub lead_minutes: i64,
}

#[derive(Debug)]
pub enum UseCaseError {
    TriggerInPast(DateTime<Utc>),
    LeadOutOfRange(i64),
    Storage,
}

impl From<UseCaseError> for ChimeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::TriggerInPast(at) => Self::BadClientData(format!(
                "The reminder would trigger at {}, which is in the past.",
                at.to_rfc3339()
            )),
            UseCaseError::LeadOutOfRange(lead) => Self::BadClientData(format!(
                "A lead of {} minutes moves the reminder outside of the supported calendar.",
                lead
            )),
            UseCaseError::Storage => Self::InternalError,
        }
    }
}

#[async_trait::async_trait]
impl UseCase for CreateScheduleReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateScheduleReminder";

    async fn execute(&mut self, ctx: &ChimeContext) -> Result<Self::Response, Self::Error> {
        let lead = if self.lead_minutes <= 0 {
            ctx.config.default_lead_minutes
        } else {
            self.lead_minutes
        };

        let now = ctx.sys.now();
        let trigger_at = Duration::try_minutes(lead)
            .and_then(|lead| self.schedule.start_time.checked_sub_signed(lead))
            .ok_or(UseCaseError::LeadOutOfRange(lead))?;
        if trigger_at <= now {
            return Err(UseCaseError::TriggerInPast(trigger_at));
        }

        match ctx.timezone_validator.validate_timestamp(trigger_at.timestamp()) {
            Ok(res) => {
                for warning in res.warnings {
                    warn!(schedule_id = %self.schedule.id, "{}", warning);
                }
            }
            Err(e) => warn!(schedule_id = %self.schedule.id, "Unable to validate trigger time: {}", e),
        }

        let mut reminder = Reminder::new(
            self.user_id,
            ReminderType::Schedule,
            trigger_at,
            self.schedule.reminder_message(lead),
            ctx.config.default_channels.clone(),
            now,
        );
        reminder.target_id = Some(self.schedule.id.clone());
        reminder.metadata.insert(
            metadata_keys::SCHEDULE_TITLE.to_string(),
            self.schedule.title.clone(),
        );
        reminder
            .metadata
            .insert(metadata_keys::LEAD_MINUTES.to_string(), lead.to_string());

        ctx.repos
            .reminders
            .insert(&reminder)
            .await
            .map_err(|_| UseCaseError::Storage)?;

        info!(
            reminder_id = %reminder.id,
            schedule_id = %self.schedule.id,
            "Reminder scheduled at {}",
            reminder.trigger_at.to_rfc3339()
        );
        Ok(reminder)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chime_domain::{Channel, ReminderStatus};
    use chime_infra::{Config, StaticTimeSys};
    use chrono::TimeZone;
    use std::sync::Arc;

    fn setup(now: DateTime<Utc>) -> ChimeContext {
        ChimeContext::create_inmemory(Config::default()).with_sys(Arc::new(StaticTimeSys::new(now)))
    }

    fn schedule(start_time: DateTime<Utc>, location: Option<&str>) -> ScheduleInfo {
        ScheduleInfo {
            id: "schedule-1".into(),
            title: "Standup".into(),
            start_time,
            location: location.map(String::from),
        }
    }

    #[actix_web::main]
    #[test]
    async fn creates_pending_reminder_before_start() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap();
        let ctx = setup(now);

        let mut usecase = CreateScheduleReminderUseCase {
            user_id: 7,
            schedule: schedule(now + Duration::hours(2), Some("Room 4")),
            lead_minutes: 30,
        };
        let reminder = usecase.execute(&ctx).await.unwrap();

        assert_eq!(reminder.trigger_at, now + Duration::minutes(90));
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.kind, ReminderType::Schedule);
        assert_eq!(reminder.target_id.as_deref(), Some("schedule-1"));
        assert_eq!(reminder.message, "\"Standup\" starts in 30 minutes at Room 4");
        assert_eq!(reminder.channels, vec![Channel::app()]);
        assert_eq!(reminder.metadata.get(metadata_keys::LEAD_MINUTES).unwrap(), "30");
        assert_eq!(
            reminder.metadata.get(metadata_keys::SCHEDULE_TITLE).unwrap(),
            "Standup"
        );
        assert_eq!(ctx.repos.reminders.find(&reminder.id).await, Some(reminder));
    }

    #[actix_web::main]
    #[test]
    async fn non_positive_lead_uses_default() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap();
        let ctx = setup(now);

        let mut usecase = CreateScheduleReminderUseCase {
            user_id: 7,
            schedule: schedule(now + Duration::hours(1), None),
            lead_minutes: 0,
        };
        let reminder = usecase.execute(&ctx).await.unwrap();
        assert_eq!(
            reminder.trigger_at,
            now + Duration::hours(1) - Duration::minutes(ctx.config.default_lead_minutes)
        );
    }

    #[actix_web::main]
    #[test]
    async fn rejects_trigger_in_the_past() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap();
        let ctx = setup(now);

        let mut usecase = CreateScheduleReminderUseCase {
            user_id: 7,
            schedule: schedule(now + Duration::minutes(10), None),
            lead_minutes: 30,
        };
        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::TriggerInPast(_))));
        assert!(ctx.repos.reminders.find_by_user(7, None).await.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_lead_outside_the_calendar() {
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 10, 0, 0).unwrap();
        let ctx = setup(now);

        for lead in [i64::MAX, 500_000_000_000] {
            let mut usecase = CreateScheduleReminderUseCase {
                user_id: 7,
                schedule: schedule(now + Duration::hours(2), None),
                lead_minutes: lead,
            };
            let res = usecase.execute(&ctx).await;
            assert!(matches!(res, Err(UseCaseError::LeadOutOfRange(l)) if l == lead));
        }
        assert!(ctx.repos.reminders.find_by_user(7, None).await.is_empty());
    }
}
