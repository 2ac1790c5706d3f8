// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time arithmetic and parsing.

use chrono::{DateTime, Months, NaiveDate, Utc};

/// Latest birthdate (exclusive) of someone strictly older than `age` years on `today`.
///
/// A Feb 29 threshold in a non-leap year clamps to Feb 28.
pub fn age_threshold(today: NaiveDate, age: u32) -> Option<NaiveDate> {
    today.checked_sub_months(Months::new(age.checked_mul(12)?))
}

/// Parse an instant given either as `yyyy-MM-dd` (midnight UTC) or RFC 3339.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_threshold() {
        assert_eq!(age_threshold(date(2024, 6, 15), 30), Some(date(1994, 6, 15)));
        assert_eq!(age_threshold(date(2024, 6, 15), 0), Some(date(2024, 6, 15)));
    }

    #[test]
    fn test_age_threshold_leap_day_clamps() {
        assert_eq!(age_threshold(date(2024, 2, 29), 1), Some(date(2023, 2, 28)));
    }

    #[test]
    fn test_age_threshold_out_of_range() {
        assert_eq!(age_threshold(date(2024, 1, 1), u32::MAX), None);
    }

    #[test]
    fn test_parse_instant_accepts_dates_and_timestamps() {
        assert_eq!(
            parse_instant("2024-05-01"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_instant("2024-05-01T08:30:00+02:00"),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap())
        );
        assert_eq!(parse_instant("yesterday"), None);
    }
}
