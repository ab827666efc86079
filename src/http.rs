//! The byte-fetching capability both data sources are built on.
//!
//! Everything that touches the network goes through [`HttpFetch`], so tests
//! (and alternative transports) can swap in their own implementation
//! without touching the fetch loops.

use async_trait::async_trait;
use log::{info, warn};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    Request(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}

/// Fetches the raw bytes behind a URL.
#[async_trait]
pub trait HttpFetch: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Default [`HttpFetch`] implementation backed by a shared [`reqwest::Client`].
pub struct ReqwestFetch {
    client: Client,
}

impl ReqwestFetch {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Like [`ReqwestFetch::new`], with a per-request timeout. The upstream
    /// sources have no timeout of their own; this is purely a client-side
    /// bound.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ReqwestFetch {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpFetch for ReqwestFetch {
    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        info!("Downloading data from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Request(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::Status {
                        url: url.to_string(),
                        status,
                    }
                } else {
                    FetchError::Request(url.to_string(), e)
                });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Request(url.to_string(), e))?;
        info!("Downloaded {} bytes from {}", bytes.len(), url);
        Ok(bytes.to_vec())
    }
}
