//! Retrieval of per-day case report files and their concatenation into one
//! table.
//!
//! The upstream repository publishes one CSV per calendar day, named by the
//! `MM-DD-YYYY` date. A multi-day fetch is all-or-nothing: a single failed
//! day fails the whole operation, and days are fetched strictly in date
//! order with no fan-out.

use crate::cases::error::CaseDataError;
use crate::cases::frame::{CaseFrame, CASE_COLUMNS};
use crate::dates::{date_range, format_date, parse_date, validate_end_date};
use crate::http::HttpFetch;
use chrono::NaiveDate;
use log::warn;
use polars::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;
use tokio::task;

const DAILY_REPORT_BASE_URL: &str =
    "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_daily_reports";

/// URL of the daily report file for one calendar day.
pub fn daily_report_url(date: NaiveDate) -> String {
    format!("{}/{}.csv", DAILY_REPORT_BASE_URL, format_date(date))
}

/// Fetches every daily report from `start` to `end` inclusive and
/// concatenates them, in date order, into one [`CaseFrame`].
///
/// Both dates are `MM-DD-YYYY` strings; `end` must fall on or before
/// yesterday (reports are published with a one-day lag). A start after the
/// end yields an empty frame carrying the full column schema.
///
/// # Errors
///
/// * [`crate::DateError::Format`] / [`crate::DateError::TooRecent`] for bad
///   or too-recent dates.
/// * [`crate::FetchError`] when any single day's retrieval fails; the whole
///   fetch fails with it, there is no partial result.
/// * [`CaseDataError::SchemaMismatch`] when a day's file does not have the
///   expected 12 columns.
pub async fn fetch_cases(
    http: &dyn HttpFetch,
    start: &str,
    end: &str,
) -> Result<CaseFrame, CaseDataError> {
    let start_date = parse_date(start)?;
    let end_date = validate_end_date(end)?;

    let days = date_range(start_date, end_date);
    if days.is_empty() {
        warn!(
            "No dates to search between {} and {}; returning an empty table",
            start, end
        );
        return Ok(CaseFrame::empty());
    }

    let mut frames = Vec::with_capacity(days.len());
    for day in days {
        // one report at a time, in date order
        let bytes = http.fetch_bytes(&daily_report_url(day)).await?;
        let df = csv_to_dataframe(bytes, &format_date(day)).await?;
        frames.push(df.lazy());
    }

    let combined = concat(frames, UnionArgs::default())?;
    Ok(CaseFrame::new(combined))
}

/// Parses one day's CSV payload (header row, `Last_Update` as a timestamp)
/// on the blocking pool and verifies the expected schema.
async fn csv_to_dataframe(bytes: Vec<u8>, date: &str) -> Result<DataFrame, CaseDataError> {
    let date_owned = date.to_string();

    task::spawn_blocking(move || {
        let mut temp_file = NamedTempFile::new().map_err(|e| CaseDataError::CsvReadIo {
            date: date_owned.clone(),
            source: e,
        })?;
        temp_file
            .write_all(&bytes)
            .map_err(|e| CaseDataError::CsvReadIo {
                date: date_owned.clone(),
                source: e,
            })?;
        temp_file.flush().map_err(|e| CaseDataError::CsvReadIo {
            date: date_owned.clone(),
            source: e,
        })?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
            .try_into_reader_with_file_path(Some(temp_file.path().to_path_buf()))
            .map_err(|e| CaseDataError::CsvReadPolars {
                date: date_owned.clone(),
                source: e,
            })?
            .finish()
            .map_err(|e| CaseDataError::CsvReadPolars {
                date: date_owned.clone(),
                source: e,
            })?;

        if df.width() != CASE_COLUMNS.len() {
            warn!(
                "Daily report for {} has {} columns, expected {}",
                date_owned,
                df.width(),
                CASE_COLUMNS.len()
            );
            return Err(CaseDataError::SchemaMismatch {
                date: date_owned,
                expected: CASE_COLUMNS.len(),
                found: df.width(),
            });
        }

        Ok(df)
    })
    .await?
}
