//! The main entry point for fetching and filtering case reports and
//! looking up historical weather conditions.

use crate::cases::fetcher::fetch_cases;
use crate::cases::frame::CaseFrame;
use crate::error::CovidDataError;
use crate::http::{HttpFetch, ReqwestFetch};
use crate::reference::Validator;
use crate::weather::fetcher::fetch_weather_json;
use bon::bon;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Directory the default reference lists ship in.
const DEFAULT_REFERENCE_DIR: &str = "data";

/// A geographical coordinate: latitude first, longitude second.
///
/// # Examples
///
/// ```
/// use covid19_data::LatLon;
///
/// let boston = LatLon(42.3601, -71.0589);
/// assert_eq!(boston.0, 42.3601); // Latitude
/// assert_eq!(boston.1, -71.0589); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

/// Client for the case-report repository and the forecast API.
///
/// Construction loads the two reference lists once; they are held for the
/// client's lifetime and used for every filter validation. The network
/// seam is injectable, so tests (or a retrying transport) can replace it.
///
/// # Examples
///
/// ```no_run
/// use covid19_data::{CovidData, CovidDataError};
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), CovidDataError> {
/// let client = CovidData::builder().build()?;
/// let spain = client
///     .case_data_by_country("04-04-2020", "04-05-2020", "Spain")
///     .await?;
/// println!("{}", spain.collect()?);
/// # Ok(())
/// # }
/// ```
pub struct CovidData {
    http: Arc<dyn HttpFetch>,
    validator: Validator,
}

#[bon]
impl CovidData {
    /// Builds a client.
    ///
    /// All settings are optional:
    /// * `http` — a custom [`HttpFetch`] implementation; defaults to a
    ///   shared reqwest client.
    /// * `reference_dir` — directory holding `country_region.csv` and
    ///   `state_province.csv`; defaults to `data/`.
    /// * `timeout` — per-request bound on the default transport; ignored
    ///   when `http` is supplied. The upstream sources impose none.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ValidationError`] (wrapped) when a reference list
    /// cannot be read or is empty.
    #[builder]
    pub fn new(
        http: Option<Arc<dyn HttpFetch>>,
        reference_dir: Option<PathBuf>,
        timeout: Option<Duration>,
    ) -> Result<Self, CovidDataError> {
        let http = match http {
            Some(http) => http,
            None => {
                let fetch = match timeout {
                    Some(timeout) => ReqwestFetch::with_timeout(timeout),
                    None => ReqwestFetch::new(),
                };
                Arc::new(fetch) as Arc<dyn HttpFetch>
            }
        };
        let reference_dir =
            reference_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_DIR));
        let validator = Validator::from_dir(&reference_dir)?;
        Ok(Self { http, validator })
    }
}

impl CovidData {
    /// Fetches every daily case report from `start` to `end` inclusive
    /// (both `MM-DD-YYYY`) as one combined [`CaseFrame`].
    pub async fn case_data(&self, start: &str, end: &str) -> Result<CaseFrame, CovidDataError> {
        Ok(fetch_cases(self.http.as_ref(), start, end).await?)
    }

    /// Validates `name` against the country/region reference list, then
    /// returns the rows exactly matching it.
    pub fn filter_cases_by_country_region(
        &self,
        cases: &CaseFrame,
        name: &str,
    ) -> Result<CaseFrame, CovidDataError> {
        self.validator.validate_country_region(name)?;
        Ok(cases.country_region(name))
    }

    /// Validates `name` against the province/state reference list, then
    /// returns the rows exactly matching it.
    pub fn filter_cases_by_province_state(
        &self,
        cases: &CaseFrame,
        name: &str,
    ) -> Result<CaseFrame, CovidDataError> {
        self.validator.validate_province_state(name)?;
        Ok(cases.province_state(name))
    }

    /// Fetch-then-filter for a single country or region.
    pub async fn case_data_by_country(
        &self,
        start: &str,
        end: &str,
        country_or_region: &str,
    ) -> Result<CaseFrame, CovidDataError> {
        let all_cases = self.case_data(start, end).await?;
        self.filter_cases_by_country_region(&all_cases, country_or_region)
    }

    /// Fetch-then-filter for a single province or state.
    pub async fn case_data_by_province_state(
        &self,
        start: &str,
        end: &str,
        province_or_state: &str,
    ) -> Result<CaseFrame, CovidDataError> {
        let all_cases = self.case_data(start, end).await?;
        self.filter_cases_by_province_state(&all_cases, province_or_state)
    }

    /// Fetches the raw forecast document for `date` (`MM-DD-YYYY`) at the
    /// given coordinates. Pass the result to
    /// [`crate::extract_weather_record`] or
    /// [`crate::extract_weather_frame`] to normalize it.
    pub async fn weather_json(
        &self,
        api_token: &str,
        location: LatLon,
        date: &str,
    ) -> Result<Value, CovidDataError> {
        Ok(fetch_weather_json(self.http.as_ref(), api_token, location, date).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FetchError;
    use crate::reference::ValidationError;
    use async_trait::async_trait;
    use reqwest::StatusCode;

    const DAY_REPORT: &str = "\
FIPS,Admin2,Province_State,Country_Region,Last_Update,Lat,Long_,Confirmed,Deaths,Recovered,Active,Combined_Key
36061,New York,New York,US,2020-04-20 23:36:47,40.767273,-73.971526,141235,10834,0,130401,\"New York, New York, US\"
,,Ontario,Canada,2020-04-20 23:36:47,51.2538,-85.3232,11184,584,5515,5085,\"Ontario, Canada\"
,,,Spain,2020-04-20 23:36:47,40.463667,-3.74922,200210,20852,80587,98771,Spain
";

    /// Serves the same daily report for every requested URL.
    struct OneReportHttp;

    #[async_trait]
    impl HttpFetch for OneReportHttp {
        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            if url.contains("csse_covid_19_daily_reports") {
                Ok(DAY_REPORT.as_bytes().to_vec())
            } else {
                Err(FetchError::Status {
                    url: url.to_string(),
                    status: StatusCode::NOT_FOUND,
                })
            }
        }
    }

    fn test_client() -> CovidData {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("country_region.csv"),
            "Country_Region\nCanada\nUS\nSpain\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("state_province.csv"),
            "Province_State\nNew York\nOntario\n",
        )
        .unwrap();

        CovidData::builder()
            .http(Arc::new(OneReportHttp))
            .reference_dir(dir.path().to_path_buf())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn fetch_and_filter_by_country() {
        let client = test_client();
        let canada = client
            .case_data_by_country("04-20-2020", "04-20-2020", "Canada")
            .await
            .unwrap();
        let df = canada.collect().unwrap();
        assert_eq!(df.height(), 1);
        let records = canada.records().unwrap();
        assert_eq!(records[0].province_state.as_deref(), Some("Ontario"));
    }

    #[tokio::test]
    async fn fetch_and_filter_by_province_state() {
        let client = test_client();
        let ny = client
            .case_data_by_province_state("04-20-2020", "04-20-2020", "New York")
            .await
            .unwrap();
        assert_eq!(ny.collect().unwrap().height(), 1);
    }

    #[tokio::test]
    async fn unknown_country_fails_validation_with_the_accepted_list() {
        let client = test_client();
        let cases = client.case_data("04-20-2020", "04-20-2020").await.unwrap();
        let err = client
            .filter_cases_by_country_region(&cases, "Pandora")
            .unwrap_err();
        match err {
            CovidDataError::Validation(ValidationError::UnknownValue {
                value, accepted, ..
            }) => {
                assert_eq!(value, "Pandora");
                assert_eq!(accepted, vec!["Canada", "US", "Spain"]);
            }
            other => panic!("expected UnknownValue, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn known_country_validates_silently() {
        let client = test_client();
        let cases = client.case_data("04-20-2020", "04-20-2020").await.unwrap();
        assert!(client
            .filter_cases_by_country_region(&cases, "Canada")
            .is_ok());
    }

    #[tokio::test]
    async fn filtering_twice_returns_the_same_rows() {
        let client = test_client();
        let cases = client.case_data("04-20-2020", "04-20-2020").await.unwrap();
        let once = client
            .filter_cases_by_country_region(&cases, "Spain")
            .unwrap();
        let twice = client
            .filter_cases_by_country_region(&once, "Spain")
            .unwrap();
        assert_eq!(once.collect().unwrap(), twice.collect().unwrap());
    }
}
