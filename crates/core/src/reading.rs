//! Reading and aggregate models.
//!
//! Temperatures are carried as `f64` Celsius everywhere. The only textual
//! form is produced by [`format_celsius`], which belongs at the presentation
//! boundary (HTTP responses, alert emails).

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Offset between the Kelvin and Celsius scales.
pub const KELVIN_OFFSET: f64 = 273.15;

/// One observation for one location at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Canonical location name as reported by the source.
    pub location: String,
    pub temperature_celsius: f64,
    pub humidity_percent: f64,
    /// Wind speed in metres per second.
    pub wind_speed: f64,
    /// ISO 3166 country code, when the source provides one.
    pub country: Option<String>,
    pub observed_at: Timestamp,
}

/// Min/max/mean temperature statistics for one location over a window.
///
/// The numeric aggregates are `None` when `sample_count == 0` so that an
/// empty window can never be mistaken for a 0 °C average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateSummary {
    pub location: String,
    pub window_start: Timestamp,
    pub window_end: Timestamp,
    pub avg_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub sample_count: i64,
}

impl AggregateSummary {
    /// A zero-sample summary for a window with no readings.
    pub fn empty(location: impl Into<String>, window_start: Timestamp, window_end: Timestamp) -> Self {
        Self {
            location: location.into(),
            window_start,
            window_end,
            avg_temp: None,
            min_temp: None,
            max_temp: None,
            sample_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sample_count == 0
    }
}

/// Round to two decimal places (half away from zero).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Convert a provider temperature in Kelvin to Celsius, rounded to two
/// decimals. This is the single conversion applied to every reading.
pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    round2(kelvin - KELVIN_OFFSET)
}

/// Format a Celsius value with exactly two decimals for display.
pub fn format_celsius(celsius: f64) -> String {
    format!("{celsius:.2}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
