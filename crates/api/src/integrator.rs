use crate::{
    reminder::{
        cancel_reminder::CancelReminderUseCase,
        cancel_target_reminders::CancelTargetRemindersUseCase,
        create_reminder::CreateReminderUseCase,
        create_schedule_reminder::CreateScheduleReminderUseCase,
        get_user_reminders::GetUserRemindersUseCase,
    },
    shared::usecase::execute,
};
use chime_domain::{
    lead_time::{schedule_lead_minutes, todo_lead_minutes},
    CreateReminderRequest, Metadata, Reminder, ReminderStatus, ReminderType, ScheduleInfo,
    SmartSuggestion, TodoInfo, UserHabits,
};
use chime_infra::ChimeContext;
use chrono::{Duration, Timelike};
use std::collections::HashSet;
use tracing::warn;

/// Turns schedule and todo lifecycle events into reminders.
///
/// Creating a reminder never blocks the event that asked for it, so creation
/// failures are logged and reported as `None`.
#[derive(Clone)]
pub struct Integrator {
    ctx: ChimeContext,
}

impl Integrator {
    pub fn new(ctx: ChimeContext) -> Self {
        Self { ctx }
    }

    pub async fn on_schedule_created(&self, user_id: i64, schedule: &ScheduleInfo) -> Option<Reminder> {
        let lead_minutes = self.schedule_lead_time(user_id, schedule).await;
        let usecase = CreateScheduleReminderUseCase {
            user_id,
            schedule: schedule.clone(),
            lead_minutes,
        };
        execute(usecase, &self.ctx).await.ok()
    }

    pub async fn on_schedule_updated(&self, user_id: i64, schedule: &ScheduleInfo) -> Option<Reminder> {
        self.cancel_target(&schedule.id).await;
        self.on_schedule_created(user_id, schedule).await
    }

    /// Returns the number of cancelled reminders
    pub async fn on_schedule_deleted(&self, schedule_id: &str) -> usize {
        self.cancel_target(schedule_id).await
    }

    pub async fn on_todo_created(&self, user_id: i64, todo: &TodoInfo) -> Option<Reminder> {
        let due_time = todo.due_time?;
        let lead_minutes = todo_lead_minutes(todo.priority);

        let usecase = CreateReminderUseCase {
            user_id,
            request: CreateReminderRequest {
                kind: ReminderType::Todo,
                target_id: Some(todo.id.clone()),
                trigger_at: due_time - Duration::minutes(lead_minutes),
                message: todo.reminder_message(lead_minutes),
                channels: Vec::new(),
                metadata: Metadata::new(),
            },
        };
        execute(usecase, &self.ctx).await.ok()
    }

    pub async fn on_todo_updated(&self, user_id: i64, todo: &TodoInfo) -> Option<Reminder> {
        self.cancel_target(&todo.id).await;
        self.on_todo_created(user_id, todo).await
    }

    pub async fn on_todo_completed(&self, todo_id: &str) -> usize {
        self.cancel_target(todo_id).await
    }

    pub async fn on_todo_deleted(&self, todo_id: &str) -> usize {
        self.cancel_target(todo_id).await
    }

    pub async fn create_smart_reminder(
        &self,
        user_id: i64,
        suggestion: SmartSuggestion,
    ) -> Option<Reminder> {
        let mut metadata = Metadata::new();
        metadata.insert("confidence".into(), suggestion.confidence.to_string());
        if !suggestion.reason.is_empty() {
            metadata.insert("reason".into(), suggestion.reason);
        }

        let usecase = CreateReminderUseCase {
            user_id,
            request: CreateReminderRequest {
                kind: ReminderType::Smart,
                target_id: suggestion.related_entity_id,
                trigger_at: suggestion.suggested_time,
                message: suggestion.message,
                channels: Vec::new(),
                metadata,
            },
        };
        execute(usecase, &self.ctx).await.ok()
    }

    /// Schedules whose reminder could not be created are skipped
    pub async fn batch_create_for_schedules(
        &self,
        user_id: i64,
        schedules: &[ScheduleInfo],
    ) -> Vec<Reminder> {
        let mut reminders = Vec::with_capacity(schedules.len());
        for schedule in schedules {
            if let Some(reminder) = self.on_schedule_created(user_id, schedule).await {
                reminders.push(reminder);
            }
        }
        reminders
    }

    pub async fn get_upcoming_reminders(&self, user_id: i64) -> Vec<Reminder> {
        let usecase = GetUserRemindersUseCase {
            user_id,
            status: Some(ReminderStatus::Pending),
        };
        execute(usecase, &self.ctx).await.unwrap_or_default()
    }

    /// Makes the pending schedule reminders of a user match `schedules`.
    ///
    /// Reminders of schedules missing from `schedules` are cancelled and every
    /// listed schedule gets a fresh reminder.
    pub async fn sync_schedule_reminders(&self, user_id: i64, schedules: &[ScheduleInfo]) {
        let known: HashSet<&str> = schedules.iter().map(|s| s.id.as_str()).collect();

        for reminder in self.get_upcoming_reminders(user_id).await {
            let orphaned = reminder.kind == ReminderType::Schedule
                && !reminder
                    .target_id
                    .as_deref()
                    .map(|target| known.contains(target))
                    .unwrap_or(false);
            if orphaned {
                let usecase = CancelReminderUseCase {
                    reminder_id: reminder.id,
                };
                let _ = execute(usecase, &self.ctx).await;
            }
        }

        for schedule in schedules {
            let _ = self.on_schedule_updated(user_id, schedule).await;
        }
    }

    async fn cancel_target(&self, target_id: &str) -> usize {
        let usecase = CancelTargetRemindersUseCase {
            target_id: target_id.to_string(),
        };
        execute(usecase, &self.ctx)
            .await
            .map(|cancelled| cancelled.len())
            .unwrap_or(0)
    }

    async fn schedule_lead_time(&self, user_id: i64, schedule: &ScheduleInfo) -> i64 {
        let local_hour = schedule
            .start_time
            .with_timezone(&self.ctx.config.timezone)
            .hour();
        let habits = self.user_habits(user_id).await;
        schedule_lead_minutes(local_hour, schedule.location().is_some(), habits.as_ref())
    }

    async fn user_habits(&self, user_id: i64) -> Option<UserHabits> {
        let analyzer = self.ctx.habits.as_ref()?;
        match analyzer.get_user_habits(user_id).await {
            Ok(habits) => habits,
            Err(e) => {
                warn!(user_id, "Unable to load user habits, using default lead times: {}", e);
                None
            }
        }
    }
}
