use crate::date::resolve_local;
use chrono::{prelude::*, Duration, LocalResult};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq)]
pub enum TimezoneError {
    #[error("{0:04}-{1:02}-{2:02} {3:02}:{4:02} is not a valid calendar date and time")]
    InvalidDate(i32, u32, u32, u32, u32),
    #[error("timestamp {0} is out of range")]
    InvalidTimestamp(i64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid_time: DateTime<Tz>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeRangeValidationResult {
    pub start_valid_time: DateTime<Tz>,
    pub end_valid_time: Option<DateTime<Tz>>,
    pub warnings: Vec<String>,
    pub is_valid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DSTTransitionType {
    SpringForward,
    FallBack,
}

/// Diagnostic description of a UTC offset change. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DSTTransition {
    /// First instant with the new offset
    pub time: DateTime<Tz>,
    pub kind: DSTTransitionType,
    /// Seconds east of UTC
    pub from_offset: i32,
    pub to_offset: i32,
    pub zone_name: String,
    pub zone_name_new: String,
}

impl Display for DSTTransition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self.kind {
            DSTTransitionType::SpringForward => "Spring forward",
            DSTTransitionType::FallBack => "Fall back",
        };
        write!(
            f,
            "{} at {}: offset changes from {} to {} seconds ({} to {})",
            label,
            self.time.format("%Y-%m-%d %H:%M"),
            self.from_offset,
            self.to_offset,
            self.zone_name,
            self.zone_name_new
        )
    }
}

/// Guards wall-clock times against DST gaps and overlaps in one zone
#[derive(Debug, Clone)]
pub struct TimezoneValidator {
    tz: Tz,
}

impl TimezoneValidator {
    /// Unknown zone names fall back to UTC
    pub fn new(timezone: &str) -> Self {
        let tz = match timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(e) => {
                warn!(timezone, error = %e, "Invalid timezone, using UTC");
                Tz::UTC
            }
        };
        Self { tz }
    }

    pub fn with_tz(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    pub fn timezone(&self) -> &'static str {
        self.tz.name()
    }

    pub fn validate_local_time(
        &self,
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
    ) -> Result<ValidationResult, TimezoneError> {
        let local = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, 0))
            .ok_or(TimezoneError::InvalidDate(year, month, day, hour, minute))?;

        let mut warnings = Vec::new();
        let valid_time = match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(earliest, _) => {
                let warning = format!(
                    "specified time {} is ambiguous due to DST fall back, using first occurrence in {}",
                    local.format("%Y-%m-%d %H:%M"),
                    self.timezone()
                );
                warn!(date = %local.date(), "{}", warning);
                warnings.push(warning);
                earliest
            }
            LocalResult::None => {
                let adjusted = resolve_local(&self.tz, &local);
                let warning = format!(
                    "specified time {} does not exist due to DST spring forward, adjusted to {} in {}",
                    local.format("%Y-%m-%d %H:%M"),
                    adjusted.format("%H:%M"),
                    self.timezone()
                );
                warn!(date = %local.date(), "{}", warning);
                warnings.push(warning);
                adjusted
            }
        };

        Ok(ValidationResult {
            valid_time,
            warnings,
            is_valid: true,
        })
    }

    /// Validates the local wall-clock reading of an epoch timestamp.
    ///
    /// An epoch timestamp is always a real instant, so it is returned as is.
    /// Readings inside a repeated hour only produce a warning naming which of
    /// the two occurrences the timestamp is.
    pub fn validate_timestamp(&self, ts: i64) -> Result<ValidationResult, TimezoneError> {
        let valid_time = self
            .tz
            .timestamp_opt(ts, 0)
            .single()
            .ok_or(TimezoneError::InvalidTimestamp(ts))?;

        let mut warnings = Vec::new();
        let local = valid_time.naive_local();
        if let LocalResult::Ambiguous(earliest, _) = self.tz.from_local_datetime(&local) {
            let occurrence = if earliest == valid_time { "first" } else { "second" };
            let warning = format!(
                "time {} falls in the hour repeated by DST fall back in {}, this is its {} occurrence",
                local.format("%Y-%m-%d %H:%M"),
                self.timezone(),
                occurrence
            );
            warn!(date = %local.date(), "{}", warning);
            warnings.push(warning);
        }

        Ok(ValidationResult {
            valid_time,
            warnings,
            is_valid: true,
        })
    }

    /// `end_ts` of zero or less means no end
    pub fn validate_time_range(
        &self,
        start_ts: i64,
        end_ts: i64,
    ) -> Result<TimeRangeValidationResult, TimezoneError> {
        let start = self.validate_timestamp(start_ts)?;
        let mut warnings = start.warnings;

        let end_valid_time = if end_ts > 0 {
            let end = self.validate_timestamp(end_ts)?;
            warnings.extend(end.warnings);
            Some(end.valid_time)
        } else {
            None
        };

        Ok(TimeRangeValidationResult {
            start_valid_time: start.valid_time,
            end_valid_time,
            warnings,
            is_valid: true,
        })
    }

    /// Scans `[start_ts, end_ts)` day by day and reports every offset change
    pub fn dst_transitions(&self, start_ts: i64, end_ts: i64) -> Vec<DSTTransition> {
        let mut transitions = Vec::new();
        let day = 24 * 60 * 60;

        let mut current = start_ts;
        while current < end_ts {
            let (offset, zone_name) = self.offset_at(current);
            let (next_offset, zone_name_new) = self.offset_at(current + day);

            if offset != next_offset {
                let at = self.find_change(current, current + day, offset);
                let kind = if next_offset > offset {
                    DSTTransitionType::SpringForward
                } else {
                    DSTTransitionType::FallBack
                };
                transitions.push(DSTTransition {
                    time: DateTime::<Utc>::from_timestamp(at, 0)
                        .unwrap_or_default()
                        .with_timezone(&self.tz),
                    kind,
                    from_offset: offset,
                    to_offset: next_offset,
                    zone_name,
                    zone_name_new,
                });
            }

            current += day;
        }

        transitions
    }

    fn offset_at(&self, ts: i64) -> (i32, String) {
        let utc = DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default();
        let local = utc.with_timezone(&self.tz);
        (
            local.offset().fix().local_minus_utc(),
            local.format("%Z").to_string(),
        )
    }

    /// First second in `(low, high]` whose offset differs from `offset`
    fn find_change(&self, mut low: i64, mut high: i64, offset: i32) -> i64 {
        while high - low > 1 {
            let mid = low + (high - low) / 2;
            if self.offset_at(mid).0 == offset {
                low = mid;
            } else {
                high = mid;
            }
        }
        high
    }
}

impl Default for TimezoneValidator {
    fn default() -> Self {
        Self::with_tz(Tz::UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_utc_for_unknown_zones() {
        let validator = TimezoneValidator::new("Mars/Olympus_Mons");
        assert_eq!(validator.tz(), Tz::UTC);
        assert_eq!(TimezoneValidator::new("Asia/Shanghai").timezone(), "Asia/Shanghai");
    }

    #[test]
    fn plain_times_are_untouched() {
        let validator = TimezoneValidator::new("America/New_York");
        let res = validator.validate_local_time(2024, 6, 1, 9, 15).unwrap();
        assert!(res.is_valid);
        assert!(res.warnings.is_empty());
        assert_eq!((res.valid_time.hour(), res.valid_time.minute()), (9, 15));
    }

    #[test]
    fn spring_forward_gap_is_advanced() {
        let validator = TimezoneValidator::new("America/New_York");
        let res = validator.validate_local_time(2024, 3, 10, 2, 30).unwrap();
        assert!(res.is_valid);
        assert_eq!(res.valid_time.hour(), 3);
        assert_eq!(res.valid_time.minute(), 30);
        assert_eq!(res.warnings.len(), 1);
        assert!(res.warnings[0].contains("02:30"));
        assert!(res.warnings[0].contains("03:30"));
    }

    #[test]
    fn fall_back_uses_first_occurrence() {
        let validator = TimezoneValidator::new("America/New_York");
        let res = validator.validate_local_time(2024, 11, 3, 1, 30).unwrap();
        assert!(res.is_valid);
        assert_eq!(res.warnings.len(), 1);
        assert!(res.warnings[0].contains("ambiguous"));
        assert_eq!(res.valid_time.offset().fix().local_minus_utc(), -4 * 3600);
    }

    #[test]
    fn timestamps_in_the_repeated_hour_keep_their_instant() {
        let validator = TimezoneValidator::new("America/New_York");
        let first = Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap().timestamp();
        let second = first + 3600;

        let res = validator.validate_timestamp(first).unwrap();
        assert_eq!(res.valid_time.timestamp(), first);
        assert!(res.warnings[0].contains("first occurrence"));

        let res = validator.validate_timestamp(second).unwrap();
        assert_eq!(res.valid_time.timestamp(), second);
        assert_eq!(res.valid_time.offset().fix().local_minus_utc(), -5 * 3600);
        assert_eq!(res.warnings.len(), 1);
        assert!(res.warnings[0].contains("second occurrence"));

        let plain = Utc.with_ymd_and_hms(2024, 6, 1, 13, 15, 42).unwrap().timestamp();
        let res = validator.validate_timestamp(plain).unwrap();
        assert_eq!(res.valid_time.timestamp(), plain);
        assert!(res.warnings.is_empty());
    }

    #[test]
    fn rejects_impossible_dates() {
        let validator = TimezoneValidator::default();
        assert_eq!(
            validator.validate_local_time(2023, 2, 30, 10, 0),
            Err(TimezoneError::InvalidDate(2023, 2, 30, 10, 0))
        );
    }

    #[test]
    fn time_range_collects_warnings_from_both_ends() {
        let validator = TimezoneValidator::new("America/New_York");
        // 2024-11-03 05:30 UTC is the first 01:30 local
        let start = Utc.with_ymd_and_hms(2024, 11, 3, 5, 30, 0).unwrap().timestamp();
        let end = start + 3600;
        let res = validator.validate_time_range(start, end).unwrap();
        assert_eq!(res.warnings.len(), 2);
        assert!(res.end_valid_time.is_some());

        let res = validator.validate_time_range(start, 0).unwrap();
        assert_eq!(res.warnings.len(), 1);
        assert!(res.end_valid_time.is_none());
    }

    #[test]
    fn reports_transitions_of_a_year() {
        let validator = TimezoneValidator::new("America/New_York");
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap().timestamp();
        let end = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap().timestamp();
        let transitions = validator.dst_transitions(start, end);
        assert_eq!(transitions.len(), 2);

        let spring = &transitions[0];
        assert_eq!(spring.kind, DSTTransitionType::SpringForward);
        assert_eq!((spring.from_offset, spring.to_offset), (-5 * 3600, -4 * 3600));
        assert_eq!(spring.time.with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 3, 10, 7, 0, 0).unwrap());
        assert_eq!(spring.zone_name, "EST");
        assert_eq!(spring.zone_name_new, "EDT");
        assert!(spring.to_string().starts_with("Spring forward at 2024-03-10 03:00"));

        assert_eq!(transitions[1].kind, DSTTransitionType::FallBack);
        assert!(validator
            .dst_transitions(start, start + 30 * 24 * 3600)
            .is_empty());
    }

    #[test]
    fn utc_has_no_transitions() {
        let validator = TimezoneValidator::default();
        assert!(validator.dst_transitions(0, 400 * 24 * 3600).is_empty());
    }
}
