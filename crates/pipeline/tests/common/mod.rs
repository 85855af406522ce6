//! In-memory collaborators for pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;
use weatherwatch_core::collection::{Notifier, ReadingSource, ReadingStore};
use weatherwatch_core::error::{FetchError, NotifyError, StoreError};
use weatherwatch_core::reading::{round2, AggregateSummary, Reading};
use weatherwatch_core::types::Timestamp;

pub fn reading(location: &str, temperature_celsius: f64) -> Reading {
    reading_at(location, temperature_celsius, Utc::now())
}

pub fn reading_at(location: &str, temperature_celsius: f64, observed_at: Timestamp) -> Reading {
    Reading {
        location: location.to_string(),
        temperature_celsius,
        humidity_percent: 50.0,
        wind_speed: 3.0,
        country: Some("IN".to_string()),
        observed_at,
    }
}

pub fn locations(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Source
// ---------------------------------------------------------------------------

/// Returns a fixed temperature per location; unknown locations fail.
#[derive(Default)]
pub struct FakeSource {
    temperatures: Mutex<HashMap<String, f64>>,
    delay: Option<Duration>,
    panic_for: Option<String>,
}

impl FakeSource {
    pub fn with(entries: &[(&str, f64)]) -> Self {
        let temperatures = entries
            .iter()
            .map(|(loc, t)| (loc.to_string(), *t))
            .collect();
        Self {
            temperatures: Mutex::new(temperatures),
            ..Self::default()
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Panic instead of answering for `location`.
    pub fn panicking_for(mut self, location: &str) -> Self {
        self.panic_for = Some(location.to_string());
        self
    }

    pub fn set(&self, location: &str, temperature_celsius: f64) {
        self.temperatures
            .lock()
            .unwrap()
            .insert(location.to_string(), temperature_celsius);
    }
}

impl ReadingSource for FakeSource {
    async fn fetch(&self, location: &str) -> Result<Reading, FetchError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panic_for.as_deref() == Some(location) {
            panic!("source blew up for {location}");
        }
        let temperature = self.temperatures.lock().unwrap().get(location).copied();
        match temperature {
            Some(t) => Ok(reading(location, t)),
            None => Err(FetchError::new("city not found")),
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Keeps appended readings in memory and aggregates them client-side.
#[derive(Default)]
pub struct RecordingStore {
    readings: Mutex<Vec<Reading>>,
    fail_appends: AtomicBool,
    delay: Option<Duration>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let store = Self::default();
        store.fail_appends.store(true, Ordering::SeqCst);
        store
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn seed(&self, reading: Reading) {
        self.readings.lock().unwrap().push(reading);
    }

    pub fn readings(&self) -> Vec<Reading> {
        self.readings.lock().unwrap().clone()
    }

    pub fn locations(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .readings()
            .into_iter()
            .map(|r| r.location)
            .collect();
        names.sort();
        names
    }
}

impl ReadingStore for RecordingStore {
    async fn append(&self, reading: &Reading) -> Result<(), StoreError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("connection refused".to_string()));
        }
        self.readings.lock().unwrap().push(reading.clone());
        Ok(())
    }

    async fn aggregate(
        &self,
        location: Option<&str>,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> Result<Vec<AggregateSummary>, StoreError> {
        let readings = self.readings();
        let mut grouped: HashMap<String, Vec<f64>> = HashMap::new();
        for r in readings.iter().filter(|r| {
            r.observed_at >= window_start
                && r.observed_at < window_end
                && location.map_or(true, |loc| r.location == loc)
        }) {
            grouped
                .entry(r.location.clone())
                .or_default()
                .push(r.temperature_celsius);
        }

        let mut summaries: Vec<AggregateSummary> = grouped
            .into_iter()
            .map(|(loc, temps)| {
                let n = temps.len() as f64;
                AggregateSummary {
                    location: loc,
                    window_start,
                    window_end,
                    avg_temp: Some(round2(temps.iter().sum::<f64>() / n)),
                    min_temp: temps.iter().copied().reduce(f64::min),
                    max_temp: temps.iter().copied().reduce(f64::max),
                    sample_count: temps.len() as i64,
                }
            })
            .collect();
        summaries.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(summaries)
    }
}

// ---------------------------------------------------------------------------
// Notifier
// ---------------------------------------------------------------------------

/// Records every notification; can be switched to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, f64)>>,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn sent(&self) -> Vec<(String, f64)> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn notify(&self, location: &str, temperature_celsius: f64) -> Result<(), NotifyError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Delivery("smtp: 554 rejected".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((location.to_string(), temperature_celsius));
        Ok(())
    }
}
