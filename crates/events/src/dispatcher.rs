//! Fan-out of alerts to the configured delivery channels.

use weatherwatch_core::collection::Notifier;
use weatherwatch_core::error::NotifyError;

use crate::alert::TemperatureAlert;
use crate::delivery::email::EmailDelivery;
use crate::delivery::webhook::WebhookDelivery;

/// The pipeline's notifier.
///
/// With no channel configured every alert is logged and reported as
/// delivered, so a deployment without SMTP still runs the full pipeline.
/// With channels configured, all of them are attempted concurrently and the
/// alert fails if any one of them fails.
#[derive(Default)]
pub struct AlertDispatcher {
    email: Option<(EmailDelivery, String)>,
    webhook: Option<(WebhookDelivery, String)>,
}

impl AlertDispatcher {
    /// A dispatcher with no external channels (log only).
    pub fn new() -> Self {
        Self::default()
    }

    /// Send alerts by email to `recipient`.
    pub fn with_email(mut self, delivery: EmailDelivery, recipient: impl Into<String>) -> Self {
        self.email = Some((delivery, recipient.into()));
        self
    }

    /// POST alerts to `url`.
    pub fn with_webhook(mut self, delivery: WebhookDelivery, url: impl Into<String>) -> Self {
        self.webhook = Some((delivery, url.into()));
        self
    }

    /// Number of configured external channels.
    pub fn channel_count(&self) -> usize {
        usize::from(self.email.is_some()) + usize::from(self.webhook.is_some())
    }

    /// Deliver one alert through every configured channel.
    pub async fn dispatch(&self, alert: &TemperatureAlert) -> Result<(), NotifyError> {
        if self.channel_count() == 0 {
            tracing::warn!(
                location = %alert.location,
                temperature_celsius = alert.temperature_celsius,
                "Temperature alert raised; no delivery channel configured"
            );
            return Ok(());
        }

        let email = async {
            match &self.email {
                Some((delivery, recipient)) => delivery
                    .deliver(recipient, alert)
                    .await
                    .err()
                    .map(|e| format!("email: {e}")),
                None => None,
            }
        };
        let webhook = async {
            match &self.webhook {
                Some((delivery, url)) => delivery
                    .deliver(url, alert)
                    .await
                    .err()
                    .map(|e| format!("webhook: {e}")),
                None => None,
            }
        };

        let (email_err, webhook_err) = tokio::join!(email, webhook);
        let failures: Vec<String> = email_err.into_iter().chain(webhook_err).collect();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Delivery(failures.join("; ")))
        }
    }
}

impl Notifier for AlertDispatcher {
    async fn notify(&self, location: &str, temperature_celsius: f64) -> Result<(), NotifyError> {
        self.dispatch(&TemperatureAlert::new(location, temperature_celsius))
            .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
