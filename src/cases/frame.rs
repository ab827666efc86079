//! The combined daily-report table and its typed row form.

use crate::cases::error::CaseDataError;
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;

/// Column names of a daily report file, in upstream order.
pub const CASE_COLUMNS: [&str; 12] = [
    "FIPS",
    "Admin2",
    "Province_State",
    "Country_Region",
    "Last_Update",
    "Lat",
    "Long_",
    "Confirmed",
    "Deaths",
    "Recovered",
    "Active",
    "Combined_Key",
];

pub(crate) const COL_COUNTRY_REGION: &str = "Country_Region";
pub(crate) const COL_PROVINCE_STATE: &str = "Province_State";

/// One row of the combined case table.
///
/// `active` is published as `confirmed - recovered - deaths` upstream, but
/// the source does not enforce that arithmetic; treat it as informational.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseRecord {
    pub fips: Option<i64>,
    pub admin2: Option<String>,
    pub province_state: Option<String>,
    pub country_region: String,
    pub last_update: Option<NaiveDateTime>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub confirmed: Option<i64>,
    pub deaths: Option<i64>,
    pub recovered: Option<i64>,
    pub active: Option<i64>,
    pub combined_key: Option<String>,
}

/// A wrapper around a Polars `LazyFrame` holding combined daily-report
/// data, one row per (day, admin-unit) in date-iteration order.
///
/// Instances come from [`crate::fetch_cases`] or
/// [`crate::CovidData::case_data`]. The equality filters here are pure;
/// the validating counterparts live on [`crate::CovidData`].
#[derive(Clone)]
pub struct CaseFrame {
    pub frame: LazyFrame,
}

impl std::fmt::Debug for CaseFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaseFrame").finish_non_exhaustive()
    }
}

impl CaseFrame {
    pub fn new(frame: LazyFrame) -> Self {
        Self { frame }
    }

    /// An empty table carrying the full 12-column schema, as returned for
    /// an empty date range.
    pub fn empty() -> Self {
        Self::new(DataFrame::empty_with_schema(&case_schema()).lazy())
    }

    /// Applies an arbitrary Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> CaseFrame {
        CaseFrame::new(self.frame.clone().filter(predicate))
    }

    /// Rows whose `Country_Region` exactly equals `name` (case-sensitive,
    /// no trimming), order preserved.
    pub fn country_region(&self, name: &str) -> CaseFrame {
        self.filter(col(COL_COUNTRY_REGION).eq(lit(name.to_string())))
    }

    /// Rows whose `Province_State` exactly equals `name`.
    pub fn province_state(&self, name: &str) -> CaseFrame {
        self.filter(col(COL_PROVINCE_STATE).eq(lit(name.to_string())))
    }

    /// Executes the lazy plan and materializes the table.
    pub fn collect(&self) -> Result<DataFrame, CaseDataError> {
        Ok(self.frame.clone().collect()?)
    }

    /// Materializes the table as typed rows.
    pub fn records(&self) -> Result<Vec<CaseRecord>, CaseDataError> {
        let df = self.collect()?;

        let fips = df.column("FIPS")?;
        let admin2 = df.column("Admin2")?;
        let province_state = df.column("Province_State")?;
        let country_region = df.column("Country_Region")?;
        let last_update = df.column("Last_Update")?;
        let lat = df.column("Lat")?;
        let long = df.column("Long_")?;
        let confirmed = df.column("Confirmed")?;
        let deaths = df.column("Deaths")?;
        let recovered = df.column("Recovered")?;
        let active = df.column("Active")?;
        let combined_key = df.column("Combined_Key")?;

        let mut records = Vec::with_capacity(df.height());
        for idx in 0..df.height() {
            records.push(CaseRecord {
                fips: get_opt_int(fips, idx),
                admin2: get_opt_str(admin2, idx),
                province_state: get_opt_str(province_state, idx),
                country_region: get_opt_str(country_region, idx).unwrap_or_default(),
                last_update: get_opt_datetime(last_update, idx),
                lat: get_opt_float(lat, idx),
                long: get_opt_float(long, idx),
                confirmed: get_opt_int(confirmed, idx),
                deaths: get_opt_int(deaths, idx),
                recovered: get_opt_int(recovered, idx),
                active: get_opt_int(active, idx),
                combined_key: get_opt_str(combined_key, idx),
            });
        }
        Ok(records)
    }
}

/// The expected dtypes of a daily report file, used when there are no days
/// to fetch and nothing to infer from.
pub(crate) fn case_schema() -> Schema {
    Schema::from_iter([
        Field::new("FIPS".into(), DataType::Int64),
        Field::new("Admin2".into(), DataType::String),
        Field::new("Province_State".into(), DataType::String),
        Field::new("Country_Region".into(), DataType::String),
        Field::new(
            "Last_Update".into(),
            DataType::Datetime(TimeUnit::Microseconds, None),
        ),
        Field::new("Lat".into(), DataType::Float64),
        Field::new("Long_".into(), DataType::Float64),
        Field::new("Confirmed".into(), DataType::Int64),
        Field::new("Deaths".into(), DataType::Int64),
        Field::new("Recovered".into(), DataType::Int64),
        Field::new("Active".into(), DataType::Int64),
        Field::new("Combined_Key".into(), DataType::String),
    ])
}

fn get_opt_int(column: &Column, idx: usize) -> Option<i64> {
    column
        .i64()
        .ok()
        .and_then(|ca| ca.get(idx))
        .or_else(|| column.f64().ok().and_then(|ca| ca.get(idx)).map(|v| v as i64))
}

fn get_opt_float(column: &Column, idx: usize) -> Option<f64> {
    column.f64().ok().and_then(|ca| ca.get(idx))
}

fn get_opt_str(column: &Column, idx: usize) -> Option<String> {
    column
        .str()
        .ok()
        .and_then(|ca| ca.get(idx))
        .map(str::to_string)
}

fn get_opt_datetime(column: &Column, idx: usize) -> Option<NaiveDateTime> {
    let ca = column.datetime().ok()?;
    let timestamp = ca.get(idx)?;
    let utc = match ca.time_unit() {
        TimeUnit::Milliseconds => DateTime::from_timestamp_millis(timestamp),
        TimeUnit::Microseconds => DateTime::from_timestamp_micros(timestamp),
        TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(timestamp)),
    }?;
    Some(utc.naive_utc())
}
