use crate::date::{add_months, get_month_length, resolve_local};
use chrono::{prelude::*, Duration};
use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

/// Safety bound for daily rules, roughly ten years at interval 1
pub const DAILY_INSTANCE_LIMIT: usize = 1000;
/// Number of anchor weeks a weekly rule may step through
pub const WEEKLY_ITERATION_LIMIT: i64 = 520;
/// Number of months a monthly rule may step through
pub const MONTHLY_ITERATION_LIMIT: i64 = 120;
/// Horizon used when no end is given
pub const DEFAULT_HORIZON_DAYS: i64 = 365;

#[derive(Error, Debug, PartialEq)]
pub enum RecurrenceError {
    #[error("invalid recurrence type: {0}")]
    InvalidType(String),
    #[error("interval must be positive, got {0}")]
    InvalidInterval(i64),
    #[error("weekly recurrence requires at least one weekday")]
    MissingWeekdays,
    #[error("weekday {0} is out of range, expected 1 (Monday) to 7 (Sunday)")]
    InvalidWeekday(u32),
    #[error("monthly recurrence requires month_day")]
    MissingMonthDay,
    #[error("month_day {0} is out of range, expected 1 to 31")]
    InvalidMonthDay(u32),
    #[error("malformed recurrence: {0}")]
    Malformed(String),
}

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    Daily,
    Weekly,
    Monthly,
}

impl FromStr for RecurrenceType {
    type Err = RecurrenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(RecurrenceError::InvalidType(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for RecurrenceType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl Display for RecurrenceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        };
        write!(f, "{}", name)
    }
}

/// Declarative description of a repeating occurrence.
///
/// Wire shape: `{"type":"weekly","interval":1,"weekdays":[1,3],"month_day":null}`.
/// Weekdays use 1 = Monday through 7 = Sunday.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RecurrenceRule {
    #[serde(rename = "type")]
    pub kind: RecurrenceType,
    pub interval: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weekdays: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_day: Option<u32>,
}

impl RecurrenceRule {
    pub fn daily(interval: i64) -> Self {
        Self {
            kind: RecurrenceType::Daily,
            interval,
            weekdays: Vec::new(),
            month_day: None,
        }
    }

    pub fn weekly(interval: i64, weekdays: Vec<u32>) -> Self {
        Self {
            kind: RecurrenceType::Weekly,
            interval,
            weekdays,
            month_day: None,
        }
    }

    pub fn monthly(interval: i64, month_day: u32) -> Self {
        Self {
            kind: RecurrenceType::Monthly,
            interval,
            weekdays: Vec::new(),
            month_day: Some(month_day),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, RecurrenceError> {
        serde_json::from_str(raw).map_err(|e| RecurrenceError::Malformed(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, RecurrenceError> {
        serde_json::to_string(self).map_err(|e| RecurrenceError::Malformed(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), RecurrenceError> {
        if self.interval <= 0 {
            return Err(RecurrenceError::InvalidInterval(self.interval));
        }
        match self.kind {
            RecurrenceType::Daily => Ok(()),
            RecurrenceType::Weekly => {
                if self.weekdays.is_empty() {
                    return Err(RecurrenceError::MissingWeekdays);
                }
                match self.weekdays.iter().find(|wd| !(1..=7).contains(*wd)) {
                    Some(wd) => Err(RecurrenceError::InvalidWeekday(*wd)),
                    None => Ok(()),
                }
            }
            RecurrenceType::Monthly => match self.month_day {
                None => Err(RecurrenceError::MissingMonthDay),
                Some(day) if !(1..=31).contains(&day) => Err(RecurrenceError::InvalidMonthDay(day)),
                Some(_) => Ok(()),
            },
        }
    }

    /// Whether `weekday` is one of the configured days of a weekly rule
    pub fn matches_weekday(&self, weekday: Weekday) -> bool {
        self.weekdays.contains(&weekday.number_from_monday())
    }

    /// Expands the rule into concrete instants between `start` and `end` (inclusive).
    ///
    /// Every rule keeps the wall-clock time of `start` in its timezone, so a
    /// "09:00 every Monday" rule stays at 09:00 local across DST changes.
    /// When `end` is `None` the horizon is one year from now.
    pub fn generate_instances<T: TimeZone>(
        &self,
        start: &DateTime<T>,
        end: Option<&DateTime<T>>,
    ) -> Result<Vec<DateTime<T>>, RecurrenceError> {
        self.validate()?;

        let end = match end {
            Some(end) => end.clone(),
            None => {
                let horizon = Utc::now() + Duration::days(DEFAULT_HORIZON_DAYS);
                start.timezone().from_utc_datetime(&horizon.naive_utc())
            }
        };
        if end < *start {
            return Ok(Vec::new());
        }

        let instances = match self.kind {
            RecurrenceType::Daily => self.daily_instances(start, &end),
            RecurrenceType::Weekly => self.weekly_instances(start, &end),
            RecurrenceType::Monthly => self.monthly_instances(start, &end),
        };
        Ok(instances)
    }

    /// Epoch seconds variant of `generate_instances`
    pub fn generate_timestamps(
        &self,
        start_ts: i64,
        end_ts: Option<i64>,
        tz: &chrono_tz::Tz,
    ) -> Result<Vec<i64>, RecurrenceError> {
        let to_local = |ts: i64| {
            tz.timestamp_opt(ts, 0)
                .single()
                .ok_or_else(|| RecurrenceError::Malformed(format!("timestamp {} is out of range", ts)))
        };
        let start = to_local(start_ts)?;
        let end = end_ts.map(to_local).transpose()?;
        let instances = self.generate_instances(&start, end.as_ref())?;
        Ok(instances.iter().map(|i| i.timestamp()).collect())
    }

    fn daily_instances<T: TimeZone>(&self, start: &DateTime<T>, end: &DateTime<T>) -> Vec<DateTime<T>> {
        let tz = start.timezone();
        let local = start.naive_local();
        let mut instances = Vec::new();
        for i in 0..DAILY_INSTANCE_LIMIT as i64 {
            let instance = if i == 0 {
                start.clone()
            } else {
                // Stepping past chrono's representable range ends the series
                let next = i
                    .checked_mul(self.interval)
                    .and_then(Duration::try_days)
                    .and_then(|offset| local.checked_add_signed(offset));
                match next {
                    Some(next) => resolve_local(&tz, &next),
                    None => break,
                }
            };
            if instance > *end {
                break;
            }
            instances.push(instance);
        }
        instances
    }

    fn weekly_instances<T: TimeZone>(&self, start: &DateTime<T>, end: &DateTime<T>) -> Vec<DateTime<T>> {
        let tz = start.timezone();
        let local = start.naive_local();
        let time = local.time();
        let end_date = end.naive_local().date();
        let weekdays = self.weekdays.iter().copied().sorted().dedup().collect::<Vec<_>>();

        let start_date = local.date();
        let first_week = start_date - Duration::days(start_date.weekday().num_days_from_monday() as i64);

        let mut instances = Vec::new();
        'weeks: for i in 0..WEEKLY_ITERATION_LIMIT {
            let week = self
                .interval
                .checked_mul(7)
                .and_then(|days| days.checked_mul(i))
                .and_then(Duration::try_days)
                .and_then(|offset| first_week.checked_add_signed(offset));
            let week = match week {
                Some(week) if week <= end_date => week,
                _ => break,
            };
            for weekday in &weekdays {
                let date = match week.checked_add_signed(Duration::days(*weekday as i64 - 1)) {
                    Some(date) => date,
                    None => break 'weeks,
                };
                let instance = resolve_local(&tz, &date.and_time(time));
                if instance < *start {
                    continue;
                }
                if instance > *end {
                    break 'weeks;
                }
                instances.push(instance);
            }
        }
        instances
    }

    fn monthly_instances<T: TimeZone>(&self, start: &DateTime<T>, end: &DateTime<T>) -> Vec<DateTime<T>> {
        let tz = start.timezone();
        let local = start.naive_local();
        let time = local.time();
        let end_date = end.naive_local().date();
        let month_day = self.month_day.unwrap_or(1);

        let mut instances = Vec::new();
        for i in 0..MONTHLY_ITERATION_LIMIT {
            let first = self
                .interval
                .checked_mul(i)
                .and_then(|months| add_months(local.year(), local.month(), months))
                .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1));
            let first = match first {
                Some(first) => first,
                None => break,
            };
            let (year, month) = (first.year(), first.month());
            if first > end_date {
                break;
            }
            let day = month_day.min(get_month_length(year, month));
            let date = match NaiveDate::from_ymd_opt(year, month, day) {
                Some(date) => date,
                None => continue,
            };
            let instance = resolve_local(&tz, &date.and_time(time));
            if instance < *start {
                continue;
            }
            if instance > *end {
                break;
            }
            instances.push(instance);
        }
        instances
    }
}

/// Moves `date` forward to the first day matching one of the rule's weekdays.
///
/// Returns `date` unchanged when it already matches or the rule is not weekly.
pub fn align_to_first_weekday(date: NaiveDate, rule: &RecurrenceRule) -> NaiveDate {
    if rule.kind != RecurrenceType::Weekly || rule.weekdays.is_empty() {
        return date;
    }
    let current = date.weekday().number_from_monday() as i64;
    let offset = rule
        .weekdays
        .iter()
        .filter(|wd| (1..=7).contains(*wd))
        .map(|wd| (*wd as i64 - current).rem_euclid(7))
        .min()
        .unwrap_or(0);
    date + Duration::days(offset)
}
