//! Temperature threshold evaluation.
//!
//! Pure logic, no I/O. The evaluator fires on every reading strictly above the
//! ceiling; there is no cooldown or hysteresis, so two consecutive cycles over
//! the threshold produce two alerts. Callers needing de-duplication layer it
//! on top.

use serde::{Deserialize, Serialize};

use crate::reading::Reading;

/// Default temperature ceiling in degrees Celsius.
pub const DEFAULT_ALERT_THRESHOLD_CELSIUS: f64 = 35.0;

/// Process-wide temperature ceiling, fixed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThreshold {
    celsius: f64,
}

impl AlertThreshold {
    pub fn new(celsius: f64) -> Self {
        Self { celsius }
    }

    pub fn celsius(&self) -> f64 {
        self.celsius
    }

    /// `true` iff the reading's temperature strictly exceeds the ceiling.
    pub fn should_alert(&self, reading: &Reading) -> bool {
        self.exceeded_by(reading.temperature_celsius)
    }

    /// Numeric comparison on the raw Celsius value.
    pub fn exceeded_by(&self, temperature_celsius: f64) -> bool {
        temperature_celsius > self.celsius
    }
}

impl Default for AlertThreshold {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_THRESHOLD_CELSIUS)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
