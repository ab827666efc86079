use crate::cases::error::CaseDataError;
use crate::dates::DateError;
use crate::http::FetchError;
use crate::reference::ValidationError;
use crate::weather::error::WeatherError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CovidDataError {
    #[error(transparent)]
    CaseData(#[from] CaseDataError),

    #[error(transparent)]
    Weather(#[from] WeatherError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}
