//! Fixed-cadence trigger for collection cycles.
//!
//! The [`Scheduler`] fires a cycle immediately on [`start`](Scheduler::start)
//! and then once per cadence. Cycles are spawned onto a [`TaskTracker`] so a
//! slow cycle never delays the next tick, and shutdown can wait for in-flight
//! cycles with [`wait_idle`](Scheduler::wait_idle).

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use weatherwatch_core::config::OverlapPolicy;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("Scheduler is already running")]
    AlreadyRunning,
}

/// Lifecycle state of a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

struct Running {
    cancel: CancellationToken,
    ticker: JoinHandle<()>,
}

/// Fires collection cycles at a fixed cadence.
pub struct Scheduler {
    overlap: OverlapPolicy,
    tracker: TaskTracker,
    running: Option<Running>,
}

impl Scheduler {
    pub fn new(overlap: OverlapPolicy) -> Self {
        Self {
            overlap,
            tracker: TaskTracker::new(),
            running: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        if self.running.is_some() {
            SchedulerState::Running
        } else {
            SchedulerState::Stopped
        }
    }

    /// Begin firing `cycle` every `cadence`, starting now.
    ///
    /// With [`OverlapPolicy::Skip`], a tick that arrives while the previous
    /// cycle is still running is dropped. With [`OverlapPolicy::Allow`] cycles
    /// may overlap.
    pub fn start<F, Fut>(&mut self, cadence: Duration, cycle: F) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if self.running.is_some() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.tracker.reopen();
        let cancel = CancellationToken::new();
        let ticker = tokio::spawn(run_ticker(
            cadence,
            self.overlap,
            self.tracker.clone(),
            cancel.clone(),
            cycle,
        ));

        tracing::info!(
            cadence_secs = cadence.as_secs(),
            overlap = ?self.overlap,
            "Scheduler started"
        );
        self.running = Some(Running { cancel, ticker });
        Ok(())
    }

    /// Stop firing new cycles.
    ///
    /// Once this returns no further cycle will be started. Cycles already in
    /// flight keep running; use [`wait_idle`](Self::wait_idle) to wait for
    /// them. Calling `stop` on a stopped scheduler does nothing.
    pub async fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.cancel.cancel();
        if let Err(e) = running.ticker.await {
            tracing::error!(error = %e, "Scheduler ticker task failed");
        }
        tracing::info!(in_flight = self.tracker.len(), "Scheduler stopped");
    }

    /// Wait until every cycle started so far has finished.
    pub async fn wait_idle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
    }
}

async fn run_ticker<F, Fut>(
    cadence: Duration,
    overlap: OverlapPolicy,
    tracker: TaskTracker,
    cancel: CancellationToken,
    cycle: F,
) where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut interval = tokio::time::interval(cadence);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let busy = Arc::new(AtomicBool::new(false));

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = interval.tick() => {
                match overlap {
                    OverlapPolicy::Allow => {
                        tracker.spawn(cycle());
                    }
                    OverlapPolicy::Skip => {
                        if busy.swap(true, Ordering::AcqRel) {
                            tracing::warn!("Previous cycle still running, skipping tick");
                            continue;
                        }
                        let guard = BusyGuard(Arc::clone(&busy));
                        let fut = cycle();
                        tracker.spawn(async move {
                            let _guard = guard;
                            fut.await;
                        });
                    }
                }
            }
        }
    }
}

/// Clears the busy flag when the cycle finishes, even on panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
