//! Webhook delivery with bounded retry.
//!
//! [`WebhookDelivery`] POSTs the JSON form of a [`TemperatureAlert`] to an
//! external URL. A failed attempt is retried after each entry of
//! [`RETRY_BACKOFF`]; the whole exchange, backoff included, stays within
//! [`WebhookDelivery::worst_case`] so it finishes inside the pipeline's
//! per-call timeout and reports its own error.

use std::time::Duration;

use crate::alert::TemperatureAlert;

/// Pause before each retry.
pub const RETRY_BACKOFF: [Duration; 2] = [Duration::from_secs(1), Duration::from_secs(2)];

/// Bound on a single POST, connection included.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(3);

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// Transport failure: DNS, connect, timeout, or a broken response.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The endpoint answered with a non-2xx status.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

/// Delivers alerts to an external webhook endpoint.
pub struct WebhookDelivery {
    client: reqwest::Client,
}

impl WebhookDelivery {
    pub fn new() -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(ATTEMPT_TIMEOUT).build()?;
        Ok(Self { client })
    }

    /// Longest time [`deliver`](Self::deliver) can take before giving up.
    pub fn worst_case() -> Duration {
        let attempts = RETRY_BACKOFF.len() as u32 + 1;
        ATTEMPT_TIMEOUT * attempts + RETRY_BACKOFF.iter().sum::<Duration>()
    }

    /// POST `alert` to `url`, retrying transient failures.
    ///
    /// Returns the error of the last attempt when every attempt fails.
    pub async fn deliver(&self, url: &str, alert: &TemperatureAlert) -> Result<(), WebhookError> {
        let payload = alert.to_webhook_payload();

        let mut last = match self.post(url, &payload).await {
            Ok(()) => return Ok(()),
            Err(e) => e,
        };

        for (retry, pause) in RETRY_BACKOFF.iter().enumerate() {
            tracing::warn!(
                url,
                retry = retry + 1,
                backoff_ms = pause.as_millis() as u64,
                error = %last,
                "Webhook delivery failed, backing off"
            );
            tokio::time::sleep(*pause).await;

            last = match self.post(url, &payload).await {
                Ok(()) => return Ok(()),
                Err(e) => e,
            };
        }

        tracing::error!(url, error = %last, "Webhook delivery gave up");
        Err(last)
    }

    async fn post(&self, url: &str, payload: &serde_json::Value) -> Result<(), WebhookError> {
        let status = self.client.post(url).json(payload).send().await?.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(WebhookError::HttpStatus(status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use weatherwatch_core::config::DEFAULT_CALL_TIMEOUT_SECS;

    use super::*;

    #[test]
    fn retries_finish_inside_default_call_timeout() {
        assert_eq!(WebhookDelivery::worst_case(), Duration::from_secs(12));
        assert!(WebhookDelivery::worst_case() < Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS));
    }

    #[test]
    fn http_status_error_names_the_code() {
        assert_eq!(
            WebhookError::HttpStatus(502).to_string(),
            "Webhook returned HTTP 502"
        );
    }

    #[tokio::test]
    async fn failing_endpoint_is_tried_once_per_backoff_step() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let accepted = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&accepted);
        tokio::spawn(async move {
            // Hang up on every connection without answering.
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                drop(stream);
            }
        });

        let delivery = WebhookDelivery::new().unwrap();
        let alert = TemperatureAlert::new("Delhi", 40.0);
        let err = delivery
            .deliver(&format!("http://{addr}/hook"), &alert)
            .await
            .unwrap_err();

        assert!(matches!(err, WebhookError::Request(_)));
        assert!(accepted.load(Ordering::SeqCst) >= RETRY_BACKOFF.len() + 1);
    }
}
