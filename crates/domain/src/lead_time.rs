use crate::{habits::UserHabits, reminder::TodoPriority};

pub const DEFAULT_LEAD_MINUTES: i64 = 15;
const MORNING_LEAD_MINUTES: i64 = 30;
const LUNCH_LEAD_MINUTES: i64 = 10;
const EVENING_LEAD_MINUTES: i64 = 30;
const TRAVEL_MINUTES: i64 = 5;

/// Lead time for a schedule starting at `local_hour` (0-23) in the user's zone.
///
/// The habit signal only replaces the generic base. Morning, lunch and evening
/// rules win over it, and a location adds travel time to the base.
pub fn schedule_lead_minutes(local_hour: u32, has_location: bool, habits: Option<&UserHabits>) -> i64 {
    match local_hour {
        8..=9 => return MORNING_LEAD_MINUTES,
        11..=13 => return LUNCH_LEAD_MINUTES,
        18..=23 => return EVENING_LEAD_MINUTES,
        _ => {}
    }

    let base = habits
        .and_then(|h| h.time.as_ref())
        .map(|t| t.reminder_lead_min)
        .filter(|lead| *lead > 0)
        .unwrap_or(DEFAULT_LEAD_MINUTES);

    if has_location {
        base + TRAVEL_MINUTES
    } else {
        base
    }
}

pub fn todo_lead_minutes(priority: Option<TodoPriority>) -> i64 {
    match priority {
        Some(TodoPriority::High) => 60,
        Some(TodoPriority::Medium) => 30,
        Some(TodoPriority::Low) => 15,
        None => 30,
    }
}
