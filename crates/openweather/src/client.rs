//! HTTP client for the OpenWeatherMap current-weather endpoint.

use std::sync::Arc;
use std::time::Duration;

use weatherwatch_core::clock::ObservationClock;
use weatherwatch_core::collection::ReadingSource;
use weatherwatch_core::error::FetchError;
use weatherwatch_core::reading::Reading;

use crate::payload::{parse_current_weather, CurrentWeather};

/// HTTP request timeout for a single provider call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Path of the current-weather endpoint relative to the base URL.
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

/// Errors from the OpenWeatherMap client.
///
/// Collapsed into a single [`FetchError`] at the
/// [`ReadingSource`] boundary.
#[derive(Debug, thiserror::Error)]
pub enum OpenWeatherError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider answered with a non-200 `cod` or a non-2xx status.
    #[error("Provider error {code}: {message}")]
    Api { code: i64, message: String },

    /// The body could not be decoded into a current-weather response.
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

impl From<OpenWeatherError> for FetchError {
    fn from(err: OpenWeatherError) -> Self {
        match err {
            // Keep the provider's own words when it gave some.
            OpenWeatherError::Api { message, .. } => FetchError::new(message),
            other => FetchError::new(other.to_string()),
        }
    }
}

/// Client for one OpenWeatherMap account.
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    clock: Arc<ObservationClock>,
}

impl OpenWeatherClient {
    /// Create a client with its own connection pool and request timeout.
    ///
    /// * `base_url` - e.g. `https://api.openweathermap.org` (no trailing slash).
    /// * `clock` - shared process clock used to stamp `observed_at`.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        clock: Arc<ObservationClock>,
    ) -> Result<Self, OpenWeatherError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(client, base_url, api_key, clock))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        clock: Arc<ObservationClock>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            clock,
        }
    }

    /// Fetch the current weather for `location`.
    ///
    /// Sends `GET /data/2.5/weather?q={location}&appid={key}`. The location
    /// is passed through as typed; the provider resolves aliases and
    /// returns its canonical name.
    pub async fn current_weather(&self, location: &str) -> Result<CurrentWeather, OpenWeatherError> {
        tracing::debug!(location, "Requesting current weather");

        let response = self
            .client
            .get(format!("{}{CURRENT_WEATHER_PATH}", self.base_url))
            .query(&[("q", location), ("appid", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        parse_current_weather(status, &body)
    }
}

impl ReadingSource for OpenWeatherClient {
    async fn fetch(&self, location: &str) -> Result<Reading, FetchError> {
        let weather = self.current_weather(location).await.map_err(|e| {
            tracing::debug!(location, error = %e, "Current weather request failed");
            FetchError::from(e)
        })?;
        Ok(weather.into_reading(self.clock.now()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_maps_to_provider_message() {
        let err = OpenWeatherError::Api {
            code: 404,
            message: "city not found".to_string(),
        };
        assert_eq!(FetchError::from(err).message, "city not found");
    }

    #[test]
    fn malformed_error_maps_to_display_text() {
        let err = OpenWeatherError::Malformed("missing field `main`".to_string());
        assert_eq!(
            FetchError::from(err).message,
            "Malformed provider response: missing field `main`"
        );
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = OpenWeatherClient::with_client(
            reqwest::Client::new(),
            "http://localhost:8080/",
            "key",
            Arc::new(ObservationClock::new()),
        );
        assert_eq!(client.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_fetch_error() {
        // Port 9 (discard) is closed on test hosts; the connect fails fast.
        let client = OpenWeatherClient::new(
            "http://127.0.0.1:9",
            "key",
            Arc::new(ObservationClock::new()),
        )
        .expect("client should build");

        let err = client.fetch("Delhi").await.unwrap_err();
        assert!(err.message.contains("HTTP request failed"));
    }
}
