use crate::dates::DateError;
use crate::http::FetchError;
use polars::error::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaseDataError {
    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    // Errors during CSV parsing (inside the blocking task)
    #[error("I/O error processing the daily report for {date}")]
    CsvReadIo {
        date: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Parsing error processing the daily report for {date}")]
    CsvReadPolars {
        date: String,
        #[source]
        source: PolarsError,
    },

    #[error("Daily report for {date} has {found} columns, expected {expected}")]
    SchemaMismatch {
        date: String,
        expected: usize,
        found: usize,
    },

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Failed processing case frame: {0}")]
    Frame(#[from] PolarsError),
}
