//! Fetch and filter Johns Hopkins CSSE COVID-19 daily case reports, with
//! historical weather lookups against the DarkSky forecast API.
//!
//! The main entry point is [`CovidData`]. Case reports come back as a
//! [`CaseFrame`], a thin wrapper around a Polars `LazyFrame` with the
//! combined daily-report schema; weather responses are normalized into a
//! single-row frame via [`WeatherRecord`].
//!
//! ```no_run
//! use covid19_data::{CovidData, CovidDataError};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), CovidDataError> {
//!     let client = CovidData::builder().build()?;
//!     let canada = client
//!         .case_data_by_country("04-20-2020", "04-21-2020", "Canada")
//!         .await?;
//!     println!("{}", canada.collect()?);
//!     Ok(())
//! }
//! ```

mod cases;
mod client;
mod dates;
mod error;
mod http;
mod reference;
mod weather;

pub use error::CovidDataError;

pub use client::{CovidData, LatLon};

pub use cases::error::CaseDataError;
pub use cases::fetcher::{daily_report_url, fetch_cases};
pub use cases::frame::{CaseFrame, CaseRecord, CASE_COLUMNS};

pub use dates::{
    format_date, is_valid_end_date, parse_date, to_iso_timestamp, validate_end_date, DateError,
    DATE_FORMAT,
};

pub use http::{FetchError, HttpFetch, ReqwestFetch};

pub use reference::{ReferenceList, ValidationError, Validator};

pub use weather::error::WeatherError;
pub use weather::extractor::{extract_weather_frame, extract_weather_record, WeatherRecord};
pub use weather::fetcher::{fetch_weather_json, forecast_url};
