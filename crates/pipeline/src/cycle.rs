//! One collection pass over a set of locations.
//!
//! Every location runs as its own spawned task: fetch -> persist -> evaluate
//! -> notify. Tasks share nothing mutable; their outcomes are gathered into a
//! single [`CycleReport`]. A failure (or panic) in one task is recorded for
//! that location only and never cuts the cycle short.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::Instrument;
use weatherwatch_core::collection::{Notifier, ReadingSource, ReadingStore};
use weatherwatch_core::error::{FetchError, NotifyError, StoreError};
use weatherwatch_core::reading::Reading;
use weatherwatch_core::thresholds::AlertThreshold;
use weatherwatch_core::types::Timestamp;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to one location in one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    /// The reading was stored. `alerted` is `true` when it crossed the
    /// threshold and the notification was delivered.
    Recorded { reading: Reading, alerted: bool },
    /// The source returned no reading.
    FetchFailed(FetchError),
    /// The reading was fetched but could not be stored. No notification is
    /// attempted for an unstored reading.
    PersistFailed { reading: Reading, error: StoreError },
    /// The reading was stored and crossed the threshold, but delivery failed.
    NotifyFailed { reading: Reading, error: NotifyError },
    /// The location task panicked or was cancelled.
    Aborted(String),
}

impl LocationOutcome {
    /// The fetched reading, if the source produced one.
    pub fn reading(&self) -> Option<&Reading> {
        match self {
            Self::Recorded { reading, .. }
            | Self::PersistFailed { reading, .. }
            | Self::NotifyFailed { reading, .. } => Some(reading),
            Self::FetchFailed(_) | Self::Aborted(_) => None,
        }
    }

    /// `true` when the reading was stored (whether or not the alert went out).
    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Recorded { .. } | Self::NotifyFailed { .. })
    }

    /// `true` when every step that applied to this location succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Recorded { .. } => "recorded",
            Self::FetchFailed(_) => "fetch_error",
            Self::PersistFailed { .. } => "persist_error",
            Self::NotifyFailed { .. } => "notify_error",
            Self::Aborted(_) => "aborted",
        }
    }
}

/// Outcome for one input location.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationReport {
    /// The location as configured (not the source's canonical name).
    pub location: String,
    pub outcome: LocationOutcome,
}

/// Result of one cycle, one entry per input location in input order.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
    pub locations: Vec<LocationReport>,
}

impl CycleReport {
    /// Locations whose reading was stored.
    pub fn stored_count(&self) -> usize {
        self.locations.iter().filter(|r| r.outcome.is_stored()).count()
    }

    /// Locations with any failure.
    pub fn failed_count(&self) -> usize {
        self.locations
            .iter()
            .filter(|r| !r.outcome.is_success())
            .count()
    }

    /// Notifications delivered in this cycle.
    pub fn alerts_sent(&self) -> usize {
        self.locations
            .iter()
            .filter(|r| matches!(r.outcome, LocationOutcome::Recorded { alerted: true, .. }))
            .count()
    }

    /// Look up the outcome for a configured location.
    pub fn outcome_for(&self, location: &str) -> Option<&LocationOutcome> {
        self.locations
            .iter()
            .find(|r| r.location == location)
            .map(|r| &r.outcome)
    }
}

// ---------------------------------------------------------------------------
// CollectionCycle
// ---------------------------------------------------------------------------

/// The per-location pipeline plus its fan-out over many locations.
///
/// Cheap to clone; collaborators are shared behind `Arc`.
pub struct CollectionCycle<S, R, N> {
    source: Arc<S>,
    store: Arc<R>,
    notifier: Arc<N>,
    threshold: AlertThreshold,
    call_timeout: Duration,
}

impl<S, R, N> Clone for CollectionCycle<S, R, N> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            notifier: Arc::clone(&self.notifier),
            threshold: self.threshold,
            call_timeout: self.call_timeout,
        }
    }
}

impl<S, R, N> CollectionCycle<S, R, N>
where
    S: ReadingSource,
    R: ReadingStore,
    N: Notifier,
{
    /// * `call_timeout` - upper bound applied separately to the fetch, the
    ///   append, and the notification of each location.
    pub fn new(
        source: Arc<S>,
        store: Arc<R>,
        notifier: Arc<N>,
        threshold: AlertThreshold,
        call_timeout: Duration,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            threshold,
            call_timeout,
        }
    }

    pub fn threshold(&self) -> AlertThreshold {
        self.threshold
    }

    /// Run one cycle over `locations`.
    ///
    /// Never fails: every error is captured in the returned report.
    pub async fn run(&self, locations: &[String]) -> CycleReport {
        let started_at = Utc::now();
        let start = Instant::now();

        let handles: Vec<_> = locations
            .iter()
            .map(|location| {
                let cycle = self.clone();
                let location = location.clone();
                let span = tracing::info_span!("collect", location = %location);
                tokio::spawn(async move { cycle.collect_one(&location).await }.instrument(span))
            })
            .collect();

        let results = futures::future::join_all(handles).await;

        let reports: Vec<LocationReport> = locations
            .iter()
            .zip(results)
            .map(|(location, result)| {
                let outcome = result.unwrap_or_else(|e| {
                    tracing::error!(location = %location, error = %e, "Location task aborted");
                    LocationOutcome::Aborted(e.to_string())
                });
                LocationReport {
                    location: location.clone(),
                    outcome,
                }
            })
            .collect();

        let report = CycleReport {
            started_at,
            finished_at: Utc::now(),
            locations: reports,
        };

        tracing::info!(
            locations = locations.len(),
            recorded = report.stored_count(),
            failed = report.failed_count(),
            alerts = report.alerts_sent(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Collection cycle complete"
        );

        report
    }

    /// Run the pipeline for a single location.
    ///
    /// Used by [`run`](Self::run) for each task and directly by the
    /// interactive lookup path.
    pub async fn collect_one(&self, location: &str) -> LocationOutcome {
        let timeout_secs = self.call_timeout.as_secs();

        let reading = match with_timeout(self.call_timeout, self.source.fetch(location)).await {
            Some(Ok(reading)) => reading,
            Some(Err(error)) => {
                tracing::warn!(location, error = %error, "Fetch failed");
                return LocationOutcome::FetchFailed(error);
            }
            None => {
                let error = FetchError::new(format!("request timed out after {timeout_secs}s"));
                tracing::warn!(location, error = %error, "Fetch failed");
                return LocationOutcome::FetchFailed(error);
            }
        };

        let appended = with_timeout(self.call_timeout, self.store.append(&reading))
            .await
            .unwrap_or(Err(StoreError::Timeout(timeout_secs)));
        if let Err(error) = appended {
            tracing::error!(location = %reading.location, error = %error, "Failed to persist reading");
            return LocationOutcome::PersistFailed { reading, error };
        }

        if !self.threshold.should_alert(&reading) {
            tracing::debug!(
                location = %reading.location,
                temperature_celsius = reading.temperature_celsius,
                "Reading recorded"
            );
            return LocationOutcome::Recorded {
                reading,
                alerted: false,
            };
        }

        tracing::info!(
            location = %reading.location,
            temperature_celsius = reading.temperature_celsius,
            threshold_celsius = self.threshold.celsius(),
            "Temperature threshold exceeded"
        );

        let notified = with_timeout(
            self.call_timeout,
            self.notifier
                .notify(&reading.location, reading.temperature_celsius),
        )
        .await
        .unwrap_or(Err(NotifyError::Timeout(timeout_secs)));

        match notified {
            Ok(()) => LocationOutcome::Recorded {
                reading,
                alerted: true,
            },
            Err(error) => {
                tracing::error!(location = %reading.location, error = %error, "Failed to send alert");
                LocationOutcome::NotifyFailed { reading, error }
            }
        }
    }
}

/// `None` when `fut` did not finish within `limit`.
async fn with_timeout<F: Future>(limit: Duration, fut: F) -> Option<F::Output> {
    tokio::time::timeout(limit, fut).await.ok()
}
