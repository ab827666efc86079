//! Normalization of a forecast response into a single-row table.

use crate::weather::error::WeatherError;
use log::warn;
use polars::df;
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;

/// One normalized row of daily weather conditions.
///
/// Every field is independently optional: an absent upstream field stays
/// `None` rather than degrading to zero, so "not reported" never reads as
/// "reported as zero".
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeatherRecord {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    pub time: Option<i64>,
    pub dew_point: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
    pub ozone: Option<f64>,
    pub uv_index: Option<i64>,
    pub temperature_high: Option<f64>,
    pub temperature_low: Option<f64>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
}

impl WeatherRecord {
    /// Builds the single-row frame with the fixed column order.
    pub fn into_frame(self) -> Result<DataFrame, WeatherError> {
        Ok(df!(
            "latitude" => [self.latitude],
            "longitude" => [self.longitude],
            "timezone" => [self.timezone],
            "time" => [self.time],
            "dew_point" => [self.dew_point],
            "humidity" => [self.humidity],
            "pressure" => [self.pressure],
            "ozone" => [self.ozone],
            "uv_index" => [self.uv_index],
            "temperature_high" => [self.temperature_high],
            "temperature_low" => [self.temperature_low],
            "temperature_max" => [self.temperature_max],
            "temperature_min" => [self.temperature_min],
        )?)
    }
}

#[derive(Deserialize)]
struct ForecastResponse {
    latitude: Option<f64>,
    longitude: Option<f64>,
    timezone: Option<String>,
    daily: Option<DailyBlock>,
}

#[derive(Deserialize)]
struct DailyBlock {
    #[serde(default)]
    data: Vec<DailyConditions>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DailyConditions {
    time: Option<i64>,
    dew_point: Option<f64>,
    humidity: Option<f64>,
    pressure: Option<f64>,
    ozone: Option<f64>,
    uv_index: Option<i64>,
    temperature_high: Option<f64>,
    temperature_low: Option<f64>,
    temperature_max: Option<f64>,
    temperature_min: Option<f64>,
}

/// Extracts one [`WeatherRecord`] from a forecast response.
///
/// Returns `Ok(None)` when the response carries no daily data block or an
/// empty one; a record is never partially filled from nothing. Individual
/// absent fields degrade to `None` and are logged for quality monitoring.
///
/// # Errors
///
/// [`WeatherError::Payload`] when the document exists but a present field
/// has the wrong shape (e.g. a string where a number is expected).
pub fn extract_weather_record(document: &Value) -> Result<Option<WeatherRecord>, WeatherError> {
    let response = ForecastResponse::deserialize(document).map_err(WeatherError::Payload)?;

    let conditions = match response.daily.and_then(|block| block.data.into_iter().next()) {
        Some(conditions) => conditions,
        None => {
            warn!("No data returned for daily block");
            return Ok(None);
        }
    };

    let record = WeatherRecord {
        latitude: response.latitude,
        longitude: response.longitude,
        timezone: response.timezone,
        time: conditions.time,
        dew_point: conditions.dew_point,
        humidity: conditions.humidity,
        pressure: conditions.pressure,
        ozone: conditions.ozone,
        uv_index: conditions.uv_index,
        temperature_high: conditions.temperature_high,
        temperature_low: conditions.temperature_low,
        temperature_max: conditions.temperature_max,
        temperature_min: conditions.temperature_min,
    };
    warn_missing(&record);
    Ok(Some(record))
}

/// Like [`extract_weather_record`], materialized as a single-row frame.
pub fn extract_weather_frame(document: &Value) -> Result<Option<DataFrame>, WeatherError> {
    match extract_weather_record(document)? {
        Some(record) => Ok(Some(record.into_frame()?)),
        None => Ok(None),
    }
}

fn warn_missing(record: &WeatherRecord) {
    let fields: [(&str, bool); 10] = [
        ("time", record.time.is_none()),
        ("dew point", record.dew_point.is_none()),
        ("humidity", record.humidity.is_none()),
        ("pressure", record.pressure.is_none()),
        ("ozone", record.ozone.is_none()),
        ("uv index", record.uv_index.is_none()),
        ("temperature high", record.temperature_high.is_none()),
        ("temperature low", record.temperature_low.is_none()),
        ("temperature max", record.temperature_max.is_none()),
        ("temperature min", record.temperature_min.is_none()),
    ];
    for (name, missing) in fields {
        if missing {
            warn!("No value for {}", name);
        }
    }
}
