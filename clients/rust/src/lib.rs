mod base;
mod reminder;
mod schedule;
mod status;
mod timezone;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIErrorVariant, APIResponse};
use reminder::ReminderClient;
pub use reminder::{CreateReminderInput, CreateScheduleReminderInput};
use schedule::ScheduleClient;
pub use schedule::PreviewBatchInput;
use status::StatusClient;
use std::sync::Arc;
use timezone::TimezoneClient;
pub use timezone::ValidateLocalTimeInput;

pub use chime_api_structs::dtos::*;
pub use chime_domain::{
    Channel, DSTTransitionType, Metadata, RecurrenceRule, RecurrenceType, ReminderStatus,
    ReminderType, Tz, ID,
};

// Domain
pub use chime_api_structs::dtos::ReminderDTO as Reminder;
pub use chime_api_structs::dtos::ScheduleRequestDTO as ScheduleRequest;

/// Chime SDK
///
/// Typed client for the reminder server API.
#[derive(Clone)]
pub struct ChimeSDK {
    pub reminder: ReminderClient,
    pub schedule: ScheduleClient,
    pub status: StatusClient,
    pub timezone: TimezoneClient,
}

impl ChimeSDK {
    pub fn new<T: Into<String>>(address: T) -> Self {
        let base = Arc::new(BaseClient::new(address.into()));

        Self {
            reminder: ReminderClient::new(base.clone()),
            schedule: ScheduleClient::new(base.clone()),
            status: StatusClient::new(base.clone()),
            timezone: TimezoneClient::new(base),
        }
    }
}
