//! Observation timestamps that never go backwards within a process.
//!
//! Concurrent location tasks stamp their readings through a shared
//! [`ObservationClock`]. Wall-clock adjustments (NTP slews, manual changes)
//! can move `Utc::now()` backwards; the clock clamps to the last issued
//! instant so per-location ordering by `observed_at` stays sound.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};

use crate::types::Timestamp;

#[derive(Debug, Default)]
pub struct ObservationClock {
    /// Last issued instant in microseconds since the Unix epoch.
    last_micros: AtomicI64,
}

impl ObservationClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, clamped so it is never earlier than any previously
    /// returned value.
    pub fn now(&self) -> Timestamp {
        self.observe(Utc::now())
    }

    fn observe(&self, wall: Timestamp) -> Timestamp {
        let candidate = wall.timestamp_micros();
        let previous = self.last_micros.fetch_max(candidate, Ordering::AcqRel);
        let issued = previous.max(candidate);
        DateTime::from_timestamp_micros(issued).unwrap_or(wall)
    }
}
