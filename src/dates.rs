//! Date formatting and freshness checks for daily-report lookups.
//!
//! The upstream repository keys each daily report file by the date in
//! `MM-DD-YYYY` form, so that format is the lingua franca of this crate's
//! public API.

use chrono::{Duration, Local, NaiveDate};
use thiserror::Error;

/// The date format used by the daily-report file names and this crate's
/// string-based API (e.g. `04-20-2020`).
pub const DATE_FORMAT: &str = "%m-%d-%Y";

#[derive(Debug, Error)]
pub enum DateError {
    #[error("'{input}' does not match the MM-DD-YYYY date format")]
    Format {
        input: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Daily reports are published with a one-day lag; an end date later
    /// than yesterday can never have a report behind it.
    #[error("{date} is not a valid end date, use a date no later than yesterday")]
    TooRecent { date: NaiveDate },
}

/// Renders a calendar date in the `MM-DD-YYYY` form used by the daily
/// report file names.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parses an `MM-DD-YYYY` string into a [`NaiveDate`].
pub fn parse_date(input: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|source| DateError::Format {
        input: input.to_string(),
        source,
    })
}

/// Returns true when `input` parses and falls on or before yesterday,
/// reading "today" from the local clock at call time.
pub fn is_valid_end_date(input: &str) -> Result<bool, DateError> {
    let date = parse_date(input)?;
    Ok(date <= yesterday())
}

/// Parses `input` and enforces the freshness bound, returning the parsed
/// date. The bound is never clamped; a too-recent date is an error.
pub fn validate_end_date(input: &str) -> Result<NaiveDate, DateError> {
    let date = parse_date(input)?;
    if date > yesterday() {
        return Err(DateError::TooRecent { date });
    }
    Ok(date)
}

/// Converts an `MM-DD-YYYY` date string into the ISO-8601 timestamp form
/// the forecast API expects (midnight, no offset).
pub fn to_iso_timestamp(input: &str) -> Result<String, DateError> {
    let date = parse_date(input)?;
    Ok(date.format("%Y-%m-%dT00:00:00").to_string())
}

/// Every calendar day from `start` to `end` inclusive, in order. Empty when
/// `start` is after `end`.
pub(crate) fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        // succ_opt only fails at NaiveDate::MAX
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

fn yesterday() -> NaiveDate {
    Local::now().date_naive() - Duration::days(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_date_pads_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2020, 4, 5).unwrap();
        assert_eq!(format_date(date), "04-05-2020");
    }

    #[test]
    fn format_date_matches_expected_pattern() {
        let samples = [
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2021, 2, 28).unwrap(),
        ];
        for date in samples {
            let formatted = format_date(date);
            let parts: Vec<&str> = formatted.split('-').collect();
            assert_eq!(parts.len(), 3);
            assert_eq!(parts[0].len(), 2);
            assert_eq!(parts[1].len(), 2);
            assert_eq!(parts[2].len(), 4);
            assert_eq!(parse_date(&formatted).unwrap(), date);
        }
    }

    #[test]
    fn parse_date_rejects_iso_order() {
        assert!(matches!(
            parse_date("2020-04-20"),
            Err(DateError::Format { .. })
        ));
    }

    #[test]
    fn yesterday_is_a_valid_end_date_today_is_not() {
        let today = Local::now().date_naive();
        let yesterday = today - Duration::days(1);
        assert!(is_valid_end_date(&format_date(yesterday)).unwrap());
        assert!(!is_valid_end_date(&format_date(today)).unwrap());
    }

    #[test]
    fn validate_end_date_flags_future_dates() {
        let tomorrow = Local::now().date_naive() + Duration::days(1);
        assert!(matches!(
            validate_end_date(&format_date(tomorrow)),
            Err(DateError::TooRecent { .. })
        ));
    }

    #[test]
    fn validate_end_date_accepts_the_past() {
        assert_eq!(
            validate_end_date("04-20-2020").unwrap(),
            NaiveDate::from_ymd_opt(2020, 4, 20).unwrap()
        );
    }

    #[test]
    fn iso_timestamp_is_midnight() {
        assert_eq!(to_iso_timestamp("04-20-2020").unwrap(), "2020-04-20T00:00:00");
    }

    #[test]
    fn date_range_is_inclusive() {
        let start = NaiveDate::from_ymd_opt(2020, 4, 29).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 5, 2).unwrap();
        let days = date_range(start, end);
        assert_eq!(days.len(), 4);
        assert_eq!(days.first().copied(), Some(start));
        assert_eq!(days.last().copied(), Some(end));
    }

    #[test]
    fn date_range_single_day() {
        let day = NaiveDate::from_ymd_opt(2020, 4, 20).unwrap();
        assert_eq!(date_range(day, day), vec![day]);
    }

    #[test]
    fn date_range_empty_when_start_after_end() {
        let start = NaiveDate::from_ymd_opt(2020, 4, 21).unwrap();
        let end = NaiveDate::from_ymd_opt(2020, 4, 20).unwrap();
        assert!(date_range(start, end).is_empty());
    }
}
