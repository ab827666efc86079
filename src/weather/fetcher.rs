//! One-shot retrieval of historical weather conditions from the DarkSky
//! forecast API.

use crate::client::LatLon;
use crate::dates::to_iso_timestamp;
use crate::http::HttpFetch;
use crate::weather::error::WeatherError;
use serde_json::Value;

const FORECAST_BASE_URL: &str = "https://api.darksky.net/forecast";

/// Forecast URL for a token, coordinate pair, and ISO-8601 timestamp. The
/// hourly, current and flags sections are excluded server-side.
pub fn forecast_url(api_token: &str, location: LatLon, iso_time: &str) -> String {
    format!(
        "{}/{}/{},{},{}?exclude=currently,hourly,flags",
        FORECAST_BASE_URL, api_token, location.0, location.1, iso_time
    )
}

/// Fetches the weather conditions for `date` (`MM-DD-YYYY`) at the given
/// coordinates and returns the parsed JSON response verbatim.
///
/// No field validation happens here; pass the document to
/// [`crate::extract_weather_record`] to normalize it.
pub async fn fetch_weather_json(
    http: &dyn HttpFetch,
    api_token: &str,
    location: LatLon,
    date: &str,
) -> Result<Value, WeatherError> {
    let time = to_iso_timestamp(date)?;
    let url = forecast_url(api_token, location, &time);

    let bytes = http.fetch_bytes(&url).await?;
    serde_json::from_slice(&bytes).map_err(|source| WeatherError::JsonDecode { url, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::FetchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockHttp {
        body: &'static str,
        requested: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpFetch for MockHttp {
        async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            Ok(self.body.as_bytes().to_vec())
        }
    }

    #[test]
    fn url_carries_token_coordinates_and_exclusions() {
        let url = forecast_url("secret", LatLon(42.3601, -71.0589), "2020-04-20T00:00:00");
        assert_eq!(
            url,
            "https://api.darksky.net/forecast/secret/42.3601,-71.0589,2020-04-20T00:00:00?exclude=currently,hourly,flags"
        );
    }

    #[tokio::test]
    async fn response_is_returned_verbatim() {
        let http = MockHttp {
            body: r#"{"latitude": 42.3601, "timezone": "America/New_York", "daily": {"data": []}}"#,
            requested: Mutex::new(Vec::new()),
        };

        let doc = fetch_weather_json(&http, "secret", LatLon(42.3601, -71.0589), "04-20-2020")
            .await
            .unwrap();

        let requested = http.requested.lock().unwrap();
        assert_eq!(requested.len(), 1);
        assert!(requested[0].contains("2020-04-20T00:00:00"));
        assert_eq!(doc["timezone"], "America/New_York");
        assert!(doc["daily"]["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_date_never_reaches_the_network() {
        let http = MockHttp {
            body: "{}",
            requested: Mutex::new(Vec::new()),
        };
        let err = fetch_weather_json(&http, "secret", LatLon(0.0, 0.0), "April 20 2020")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::Date(_)));
        assert!(http.requested.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn non_json_body_is_a_decode_error() {
        let http = MockHttp {
            body: "<html>rate limited</html>",
            requested: Mutex::new(Vec::new()),
        };
        let err = fetch_weather_json(&http, "secret", LatLon(0.0, 0.0), "04-20-2020")
            .await
            .unwrap_err();
        assert!(matches!(err, WeatherError::JsonDecode { .. }));
    }
}
