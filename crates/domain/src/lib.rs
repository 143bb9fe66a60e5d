mod app_notification;
pub mod batch;
mod date;
mod habits;
pub mod lead_time;
mod reminder;
mod shared;
pub mod timezone;

pub use app_notification::AppNotification;
pub use batch::{BatchCreateRequest, BatchError, ScheduleRequest};
pub use date::{get_month_length, is_leap_year, resolve_local};
pub use habits::{TimeHabits, UserHabits};
pub use reminder::{
    Channel, CreateReminderRequest, Reminder, ReminderError, ReminderStatus, ReminderType,
    ScheduleInfo, SmartSuggestion, TodoInfo, TodoPriority,
};
pub use shared::entity::{Entity, ID};
pub use shared::metadata::{keys as metadata_keys, Metadata};
pub use shared::recurrence::{
    align_to_first_weekday, RecurrenceError, RecurrenceRule, RecurrenceType,
};
pub use timezone::{
    DSTTransition, DSTTransitionType, TimeRangeValidationResult, TimezoneError,
    TimezoneValidator, ValidationResult,
};

pub use chrono_tz::Tz;
