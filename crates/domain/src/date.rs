use chrono::{prelude::*, Duration, LocalResult};

pub fn is_leap_year(year: i32) -> bool {
    year % 400 == 0 || (year % 100 != 0 && year % 4 == 0)
}

// month: January -> 1
pub fn get_month_length(year: i32, month: u32) -> u32 {
    match month {
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

/// Moves (year, month) forward by `months`. Month is 1-based.
///
/// Returns `None` when the resulting year does not fit in an `i32`.
pub fn add_months(year: i32, month: u32, months: i64) -> Option<(i32, u32)> {
    let zero_based = (month as i64 - 1).checked_add(months)?;
    let year = (year as i64).checked_add(zero_based.div_euclid(12))?;
    Some((i32::try_from(year).ok()?, (zero_based.rem_euclid(12) + 1) as u32))
}

/// Resolves a wall-clock time in `tz` to a concrete instant.
///
/// Ambiguous times (DST fall-back) resolve to the earliest instant. Times that
/// do not exist (DST spring-forward) are interpreted with the offset in effect
/// just before the gap, which moves them forward by the size of the gap.
pub fn resolve_local<T: TimeZone>(tz: &T, local: &NaiveDateTime) -> DateTime<T> {
    match tz.from_local_datetime(local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let mut earlier = *local;
            // Gaps are at most a couple of hours in every real zone
            for _ in 0..48 {
                earlier -= Duration::minutes(30);
                if let Some(before) = tz.from_local_datetime(&earlier).earliest() {
                    let offset = before.offset().fix();
                    let utc = *local - Duration::seconds(offset.local_minus_utc() as i64);
                    return tz.from_utc_datetime(&utc);
                }
            }
            tz.from_utc_datetime(local)
        }
    }
}

/// Returns true when the wall-clock time does not exist in `tz`
pub fn is_nonexistent_local<T: TimeZone>(tz: &T, local: &NaiveDateTime) -> bool {
    matches!(tz.from_local_datetime(local), LocalResult::None)
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono_tz::America::New_York;

    #[test]
    fn it_calculates_month_lengths() {
        assert_eq!(get_month_length(2024, 2), 29);
        assert_eq!(get_month_length(2023, 2), 28);
        assert_eq!(get_month_length(1900, 2), 28);
        assert_eq!(get_month_length(2000, 2), 29);
        assert_eq!(get_month_length(2023, 4), 30);
        assert_eq!(get_month_length(2023, 12), 31);
    }

    #[test]
    fn it_adds_months_across_years() {
        assert_eq!(add_months(2024, 1, 1), Some((2024, 2)));
        assert_eq!(add_months(2024, 12, 1), Some((2025, 1)));
        assert_eq!(add_months(2024, 11, 14), Some((2026, 1)));
        assert_eq!(add_months(2024, 5, 0), Some((2024, 5)));
        assert_eq!(add_months(2024, 5, i64::MAX), None);
    }

    #[test]
    fn resolves_gap_forward() {
        let local = NaiveDate::from_ymd_opt(2024, 3, 10)
            .and_then(|d| d.and_hms_opt(2, 30, 0))
            .unwrap();
        assert!(is_nonexistent_local(&New_York, &local));
        let resolved = resolve_local(&New_York, &local);
        assert_eq!(resolved.hour(), 3);
        assert_eq!(resolved.minute(), 30);
    }

    #[test]
    fn resolves_ambiguous_to_earliest() {
        let local = NaiveDate::from_ymd_opt(2024, 11, 3)
            .and_then(|d| d.and_hms_opt(1, 30, 0))
            .unwrap();
        let resolved = resolve_local(&New_York, &local);
        // EDT, UTC-4
        assert_eq!(resolved.offset().fix().local_minus_utc(), -4 * 3600);
    }
}
