use crate::dates::DateError;
use crate::http::FetchError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Failed to decode the forecast response for {url}")]
    JsonDecode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Forecast response has an unexpected shape")]
    Payload(#[source] serde_json::Error),

    #[error("Failed to assemble the weather frame: {0}")]
    Frame(#[from] PolarsError),
}
