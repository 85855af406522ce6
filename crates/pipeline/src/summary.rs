//! Windowed temperature statistics.
//!
//! Aggregation itself runs inside the store (see
//! [`ReadingStore::aggregate`]); this service owns the window arithmetic and
//! the empty-window rules.

use std::sync::Arc;

use chrono::{Duration, NaiveTime};
use weatherwatch_core::collection::ReadingStore;
use weatherwatch_core::error::StoreError;
use weatherwatch_core::reading::AggregateSummary;
use weatherwatch_core::types::Timestamp;

/// Start of the UTC day containing `now`, paired with `now`.
pub fn today_window(now: Timestamp) -> (Timestamp, Timestamp) {
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    (midnight, now)
}

/// The `hours` leading up to `now`.
pub fn trailing_window(now: Timestamp, hours: u32) -> (Timestamp, Timestamp) {
    (now - Duration::hours(i64::from(hours)), now)
}

/// Read-side aggregation over the reading store.
pub struct SummaryService<R> {
    store: Arc<R>,
}

impl<R> Clone for SummaryService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: ReadingStore> SummaryService<R> {
    pub fn new(store: Arc<R>) -> Self {
        Self { store }
    }

    /// Statistics for one location over `[window_start, window_end)`.
    ///
    /// A window with no readings, or an inverted window, yields a summary with
    /// `sample_count == 0` rather than an error.
    pub async fn summarize(
        &self,
        location: &str,
        window_start: Timestamp,
        window_end: Timestamp,
    ) -> Result<AggregateSummary, StoreError> {
        if window_start >= window_end {
            return Ok(AggregateSummary::empty(location, window_start, window_end));
        }

        let summary = self
            .store
            .aggregate(Some(location), window_start, window_end)
            .await?
            .into_iter()
            .next()
            .unwrap_or_else(|| AggregateSummary::empty(location, window_start, window_end));
        Ok(summary)
    }

    /// One summary per location with readings observed today (UTC).
    pub async fn daily_summaries(
        &self,
        now: Timestamp,
    ) -> Result<Vec<AggregateSummary>, StoreError> {
        let (start, end) = today_window(now);
        if start >= end {
            return Ok(Vec::new());
        }
        self.store.aggregate(None, start, end).await
    }
}
