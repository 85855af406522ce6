//! Temperature alert payload.

use chrono::{DateTime, Utc};
use serde::Serialize;
use weatherwatch_core::reading::format_celsius;

/// Dot-separated event name sent with webhook payloads.
pub const EVENT_TYPE_TEMPERATURE_EXCEEDED: &str = "temperature.threshold_exceeded";

/// One threshold crossing for one location.
#[derive(Debug, Clone, Serialize)]
pub struct TemperatureAlert {
    /// Canonical location name.
    pub location: String,
    /// The observed temperature, unformatted.
    pub temperature_celsius: f64,
    /// When the alert was raised (UTC).
    pub timestamp: DateTime<Utc>,
}

impl TemperatureAlert {
    pub fn new(location: impl Into<String>, temperature_celsius: f64) -> Self {
        Self {
            location: location.into(),
            temperature_celsius,
            timestamp: Utc::now(),
        }
    }

    /// Email subject line.
    pub fn subject(&self) -> String {
        format!("Weather Alert for {}", self.location)
    }

    /// Plain-text body. The temperature is formatted here, at the edge.
    pub fn body(&self) -> String {
        format!(
            "Temperature in {} exceeded the threshold: {}°C",
            self.location,
            format_celsius(self.temperature_celsius)
        )
    }

    /// JSON payload for webhook delivery.
    pub fn to_webhook_payload(&self) -> serde_json::Value {
        serde_json::json!({
            "event_type": EVENT_TYPE_TEMPERATURE_EXCEEDED,
            "location": self.location,
            "temperature_celsius": self.temperature_celsius,
            "timestamp": self.timestamp,
        })
    }
}
