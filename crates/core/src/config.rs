//! Monitor configuration loaded once at startup.
//!
//! [`MonitorConfig`] is an immutable value: binaries build it from the
//! environment and hand clones (or the relevant fields) to each component.
//! Nothing reads configuration from ambient global state afterwards.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::CoreError;
use crate::thresholds::{AlertThreshold, DEFAULT_ALERT_THRESHOLD_CELSIUS};

/// Default provider endpoint.
pub const DEFAULT_OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org";

/// Default polling cadence: every five minutes.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Default per external call timeout.
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 15;

/// Default alert recipient.
pub const DEFAULT_ALERT_RECIPIENT: &str = "recipient@example.com";

/// Locations polled when `POLL_LOCATIONS` is not set.
pub const DEFAULT_LOCATIONS: [&str; 6] = [
    "Delhi",
    "Mumbai",
    "Chennai",
    "Bangalore",
    "Kolkata",
    "Hyderabad",
];

/// What the scheduler does when a tick fires while the previous cycle is
/// still running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapPolicy {
    /// Start the new cycle alongside the old one.
    #[default]
    Allow,
    /// Drop the tick; the next one is tried on schedule.
    Skip,
}

impl FromStr for OverlapPolicy {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "allow" => Ok(Self::Allow),
            "skip" => Ok(Self::Skip),
            other => Err(CoreError::Validation(format!(
                "CYCLE_OVERLAP must be 'allow' or 'skip', got '{other}'"
            ))),
        }
    }
}

/// Configuration for the collection pipeline.
#[derive(Clone)]
pub struct MonitorConfig {
    pub api_key: String,
    pub base_url: String,
    pub alert_threshold: AlertThreshold,
    pub cadence: Duration,
    pub locations: Vec<String>,
    pub notify_recipient: String,
    pub call_timeout: Duration,
    pub overlap: OverlapPolicy,
}

impl fmt::Debug for MonitorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonitorConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("alert_threshold", &self.alert_threshold)
            .field("cadence", &self.cadence)
            .field("locations", &self.locations)
            .field("notify_recipient", &self.notify_recipient)
            .field("call_timeout", &self.call_timeout)
            .field("overlap", &self.overlap)
            .finish()
    }
}

impl MonitorConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable                  | Required | Default                          |
    /// |---------------------------|----------|----------------------------------|
    /// | `OPENWEATHER_API_KEY`     | yes      | --                               |
    /// | `OPENWEATHER_BASE_URL`    | no       | `https://api.openweathermap.org` |
    /// | `ALERT_THRESHOLD_CELSIUS` | no       | `35`                             |
    /// | `POLL_INTERVAL_SECS`      | no       | `300`                            |
    /// | `POLL_LOCATIONS`          | no       | six Indian metro areas           |
    /// | `ALERT_RECIPIENT`         | no       | `recipient@example.com`          |
    /// | `CALL_TIMEOUT_SECS`       | no       | `15`                             |
    /// | `CYCLE_OVERLAP`           | no       | `allow`                          |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENWEATHER_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| CoreError::Validation("OPENWEATHER_API_KEY is required".into()))?;

        let base_url = lookup("OPENWEATHER_BASE_URL")
            .map(|u| u.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_OPENWEATHER_BASE_URL.to_string());

        let threshold: f64 = parse_or(
            &lookup,
            "ALERT_THRESHOLD_CELSIUS",
            DEFAULT_ALERT_THRESHOLD_CELSIUS,
        )?;
        if !threshold.is_finite() {
            return Err(CoreError::Validation(
                "ALERT_THRESHOLD_CELSIUS must be a finite number".into(),
            ));
        }

        let cadence_secs: u64 = parse_or(&lookup, "POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)?;
        if cadence_secs == 0 {
            return Err(CoreError::Validation(
                "POLL_INTERVAL_SECS must be greater than zero".into(),
            ));
        }

        let call_timeout_secs: u64 =
            parse_or(&lookup, "CALL_TIMEOUT_SECS", DEFAULT_CALL_TIMEOUT_SECS)?;
        if call_timeout_secs == 0 {
            return Err(CoreError::Validation(
                "CALL_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }

        let locations = match lookup("POLL_LOCATIONS") {
            Some(raw) => parse_locations(&raw),
            None => DEFAULT_LOCATIONS.iter().map(|s| s.to_string()).collect(),
        };
        if locations.is_empty() {
            return Err(CoreError::Validation(
                "POLL_LOCATIONS must name at least one location".into(),
            ));
        }

        let overlap = match lookup("CYCLE_OVERLAP") {
            Some(raw) => raw.parse()?,
            None => OverlapPolicy::default(),
        };

        Ok(Self {
            api_key,
            base_url,
            alert_threshold: AlertThreshold::new(threshold),
            cadence: Duration::from_secs(cadence_secs),
            locations,
            notify_recipient: lookup("ALERT_RECIPIENT")
                .unwrap_or_else(|| DEFAULT_ALERT_RECIPIENT.to_string()),
            call_timeout: Duration::from_secs(call_timeout_secs),
            overlap,
        })
    }
}

/// Split a comma-separated location list, dropping blanks.
fn parse_locations(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, CoreError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Validation(format!("{key} has an invalid value: '{raw}'"))),
        None => Ok(default),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
