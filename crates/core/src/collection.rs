//! Collaborator seams for the collection pipeline.
//!
//! The pipeline is generic over these traits so the adapters (OpenWeatherMap
//! client, PostgreSQL store, email/webhook notifier) can be swapped for
//! in-memory fakes in tests.

use std::future::Future;

use crate::error::{FetchError, NotifyError, StoreError};
use crate::reading::{AggregateSummary, Reading};
use crate::types::Timestamp;

/// Fetches the current reading for one location.
pub trait ReadingSource: Send + Sync + 'static {
    /// Issue one request for `location`. The returned reading carries the
    /// source's canonical location name and an `observed_at` taken from a
    /// process-wide [`ObservationClock`](crate::clock::ObservationClock)
    /// when the response arrives.
    fn fetch(&self, location: &str) -> impl Future<Output = Result<Reading, FetchError>> + Send;
}

/// Append-only reading log with a native windowed aggregate.
pub trait ReadingStore: Send + Sync + 'static {
    /// Durably append one reading.
    fn append(&self, reading: &Reading) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Aggregate readings with `observed_at` in `[window_start, window_end)`,
    /// one summary per location that has at least one reading. When
    /// `location` is given only that location is considered.
    fn aggregate(
        &self,
        location: Option<&str>,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> impl Future<Output = Result<Vec<AggregateSummary>, StoreError>> + Send;
}

/// Delivers a threshold-crossing notification.
pub trait Notifier: Send + Sync + 'static {
    fn notify(
        &self,
        location: &str,
        temperature_celsius: f64,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}
