use crate::date::resolve_local;
use crate::shared::recurrence::{align_to_first_weekday, RecurrenceError, RecurrenceRule, RecurrenceType};
use chrono::{prelude::*, Duration};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_DURATION_MINUTES: i64 = 60;
pub const DEFAULT_INSTANCE_COUNT: usize = 12;
/// Roughly one year of weekly occurrences
pub const MAX_INSTANCE_COUNT: usize = 52;

#[derive(Error, Debug, PartialEq)]
pub enum BatchError {
    #[error("title is required")]
    MissingTitle,
    #[error("duration must not be negative, got {0}")]
    InvalidDuration(i64),
    #[error("duration of {0} minutes is out of range")]
    DurationOutOfRange(i64),
    #[error("invalid recurrence rule: {0}")]
    InvalidRecurrence(#[from] RecurrenceError),
}

/// A recurring schedule that should be materialized into concrete schedules
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BatchCreateRequest {
    pub title: String,
    pub start_time: DateTime<Utc>,
    /// Minutes
    #[serde(default)]
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub recurrence: RecurrenceRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Max number of instances, 0 means unset
    #[serde(default)]
    pub count: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ScheduleRequest {
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl BatchCreateRequest {
    pub fn validate(&self) -> Result<(), BatchError> {
        if self.title.trim().is_empty() {
            return Err(BatchError::MissingTitle);
        }
        if self.duration < 0 {
            return Err(BatchError::InvalidDuration(self.duration));
        }
        if Duration::try_minutes(self.duration).is_none() {
            return Err(BatchError::DurationOutOfRange(self.duration));
        }
        self.recurrence.validate()?;
        Ok(())
    }

    pub fn apply_defaults(&mut self) {
        if self.duration == 0 {
            self.duration = DEFAULT_DURATION_MINUTES;
        }
        if self.count == 0 && self.end_date.is_none() {
            self.count = DEFAULT_INSTANCE_COUNT;
        }
        if self.count > MAX_INSTANCE_COUNT {
            self.count = MAX_INSTANCE_COUNT;
        }
    }

    /// Expands the request into at most `MAX_INSTANCE_COUNT` schedules.
    ///
    /// Weekday alignment and wall-clock expansion happen in `tz`.
    pub fn generate_schedules(&self, tz: &Tz) -> Result<Vec<ScheduleRequest>, BatchError> {
        self.validate()?;
        let mut req = self.clone();
        req.apply_defaults();

        let mut start = req.start_time.with_timezone(tz);
        if req.recurrence.kind == RecurrenceType::Weekly {
            let local = start.naive_local();
            let aligned = align_to_first_weekday(local.date(), &req.recurrence);
            if aligned != local.date() {
                start = resolve_local(tz, &aligned.and_time(local.time()));
            }
        }

        let end = match req.end_date {
            Some(end) => end.with_timezone(tz),
            None => {
                let local = start.naive_local();
                // Feb 29 has no counterpart next year
                let next_year = local
                    .with_year(start.year() + 1)
                    .or_else(|| local.checked_add_signed(Duration::days(365)))
                    .unwrap_or(local);
                resolve_local(tz, &next_year)
            }
        };

        let max_count = if req.count == 0 {
            MAX_INSTANCE_COUNT
        } else {
            req.count
        };

        let duration = Duration::minutes(req.duration);
        req.recurrence
            .generate_instances(&start, Some(&end))?
            .into_iter()
            .take(max_count)
            .map(|instance| -> Result<ScheduleRequest, BatchError> {
                let start_time = instance.with_timezone(&Utc);
                let end_time = start_time
                    .checked_add_signed(duration)
                    .ok_or(BatchError::DurationOutOfRange(req.duration))?;
                Ok(ScheduleRequest {
                    title: req.title.clone(),
                    start_time,
                    end_time,
                    duration: req.duration,
                    location: req.location.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::{Asia::Shanghai, UTC};

    fn request(recurrence: RecurrenceRule) -> BatchCreateRequest {
        BatchCreateRequest {
            title: "Standup".into(),
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            duration: 0,
            location: None,
            recurrence,
            end_date: None,
            count: 0,
        }
    }

    #[test]
    fn applies_defaults() {
        let mut req = request(RecurrenceRule::daily(1));
        req.apply_defaults();
        assert_eq!(req.duration, 60);
        assert_eq!(req.count, 12);

        let mut req = request(RecurrenceRule::daily(1));
        req.count = 100;
        req.apply_defaults();
        assert_eq!(req.count, MAX_INSTANCE_COUNT);

        let mut req = request(RecurrenceRule::daily(1));
        req.end_date = Some(Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap());
        req.apply_defaults();
        assert_eq!(req.count, 0);
    }

    #[test]
    fn rejects_invalid_requests() {
        let mut req = request(RecurrenceRule::daily(1));
        req.title = " ".into();
        assert_eq!(req.validate(), Err(BatchError::MissingTitle));

        let req = request(RecurrenceRule::weekly(1, vec![]));
        assert!(matches!(
            req.generate_schedules(&UTC),
            Err(BatchError::InvalidRecurrence(RecurrenceError::MissingWeekdays))
        ));
    }

    #[test]
    fn rejects_durations_past_the_calendar() {
        let mut req = request(RecurrenceRule::daily(1));
        req.duration = i64::MAX;
        assert_eq!(req.validate(), Err(BatchError::DurationOutOfRange(i64::MAX)));

        // Representable as a duration but not once added to the start
        let mut req = request(RecurrenceRule::daily(1));
        req.duration = 100_000_000 * 24 * 60;
        assert!(matches!(
            req.generate_schedules(&UTC),
            Err(BatchError::DurationOutOfRange(_))
        ));
    }

    #[test]
    fn huge_interval_yields_only_the_first_instance() {
        let mut req = request(RecurrenceRule::daily(100_000_000));
        req.count = 5;
        let schedules = req.generate_schedules(&UTC).unwrap();
        assert_eq!(schedules.len(), 1);
        assert_eq!(schedules[0].start_time, req.start_time);
    }

    #[test]
    fn weekly_batch_lands_on_configured_days() {
        // 2024-01-02 is a Tuesday
        let mut req = request(RecurrenceRule::weekly(1, vec![1, 3, 5]));
        req.start_time = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).unwrap();
        let schedules = req.generate_schedules(&UTC).unwrap();
        assert_eq!(schedules.len(), 12);
        assert_eq!(schedules[0].start_time.day(), 3);
        for schedule in &schedules {
            assert!(matches!(
                schedule.start_time.weekday(),
                Weekday::Mon | Weekday::Wed | Weekday::Fri
            ));
            assert_eq!(schedule.end_time - schedule.start_time, Duration::minutes(60));
        }
    }

    #[test]
    fn end_date_bounds_the_batch() {
        let mut req = request(RecurrenceRule::daily(1));
        req.end_date = Some(Utc.with_ymd_and_hms(2024, 1, 5, 9, 0, 0).unwrap());
        req.location = Some("Room 1".into());
        let schedules = req.generate_schedules(&UTC).unwrap();
        assert_eq!(schedules.len(), 5);
        assert_eq!(schedules[4].location.as_deref(), Some("Room 1"));
    }

    #[test]
    fn count_is_capped_for_long_ranges() {
        let mut req = request(RecurrenceRule::daily(1));
        req.end_date = Some(Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        let schedules = req.generate_schedules(&UTC).unwrap();
        assert_eq!(schedules.len(), MAX_INSTANCE_COUNT);
    }

    #[test]
    fn aligns_in_local_time() {
        // 2024-01-01 20:00 UTC is Tuesday 04:00 in Shanghai
        let mut req = request(RecurrenceRule::weekly(1, vec![2]));
        req.start_time = Utc.with_ymd_and_hms(2024, 1, 1, 20, 0, 0).unwrap();
        req.count = 2;
        let schedules = req.generate_schedules(&Shanghai).unwrap();
        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].start_time, req.start_time);
    }

    #[test]
    fn monthly_batch_defaults_to_one_year() {
        let req = request(RecurrenceRule::monthly(1, 15));
        let schedules = req.generate_schedules(&UTC).unwrap();
        assert_eq!(schedules.len(), 12);
        assert_eq!(schedules[0].start_time.month(), 1);
        assert_eq!(schedules[11].start_time.month(), 12);
    }
}
