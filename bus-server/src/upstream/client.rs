//! Tracker HTTP client.

use async_trait::async_trait;

use crate::domain::StopCode;

use super::StopSource;
use super::error::UpstreamError;

/// Default base URL for the mobile tracker page.
const DEFAULT_BASE_URL: &str = "https://bustime.mta.info/m/index";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the tracker client.
#[derive(Debug, Clone)]
pub struct BusTimeConfig {
    /// Base URL for the tracker page (defaults to the production tracker)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for BusTimeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl BusTimeConfig {
    /// Create a config with the default production URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP client for the upstream tracker.
///
/// Requests the stop page as a browser would (`?q=<stop code>`) and hands
/// the raw body to the extractor. No schema negotiation beyond that.
#[derive(Debug, Clone)]
pub struct BusTimeClient {
    http: reqwest::Client,
    base_url: String,
}

impl BusTimeClient {
    /// Create a new tracker client with the given configuration.
    pub fn new(config: BusTimeConfig) -> Result<Self, UpstreamError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl StopSource for BusTimeClient {
    async fn stop_html(&self, stop: &StopCode) -> Result<String, UpstreamError> {
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("q", stop.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}
