//! Scheduled polling and shutdown drain.

use std::sync::Arc;
use std::time::Duration;

use weatherwatch_core::collection::{Notifier, ReadingSource, ReadingStore};
use weatherwatch_pipeline::{CollectionCycle, Scheduler, SchedulerError};

/// How long shutdown waits for in-flight cycles before giving up.
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// Run `cycle` over `locations` on every scheduler tick.
pub fn start_polling<S, R, N>(
    scheduler: &mut Scheduler,
    cycle: CollectionCycle<S, R, N>,
    locations: Vec<String>,
    cadence: Duration,
) -> Result<(), SchedulerError>
where
    S: ReadingSource,
    R: ReadingStore,
    N: Notifier,
{
    tracing::info!(locations = ?locations, "Polling locations");
    let locations: Arc<[String]> = locations.into();

    scheduler.start(cadence, move || {
        let cycle = cycle.clone();
        let locations = Arc::clone(&locations);
        async move {
            cycle.run(&locations).await;
        }
    })
}

/// Stop the scheduler and wait up to `grace` for in-flight cycles.
pub async fn drain(scheduler: &mut Scheduler, grace: Duration) {
    scheduler.stop().await;
    if tokio::time::timeout(grace, scheduler.wait_idle())
        .await
        .is_err()
    {
        tracing::warn!(
            grace_secs = grace.as_secs(),
            "In-flight collection cycles did not finish before shutdown"
        );
    } else {
        tracing::info!("Collection cycles drained");
    }
}
