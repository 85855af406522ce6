use weatherwatch_core::config::MonitorConfig;
use weatherwatch_pipeline::Scheduler;
use weatherwatch_worker::poller::{self, SHUTDOWN_GRACE};
use weatherwatch_worker::shutdown::shutdown_signal;
use weatherwatch_worker::{telemetry, wiring};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init_tracing("weatherwatch_worker=debug,weatherwatch_pipeline=debug,info");

    // --- Configuration ---
    let config = MonitorConfig::from_env()?;
    tracing::info!(?config, "Loaded monitor configuration");

    // --- Database ---
    let pool = wiring::connect_database().await?;

    // --- Collection ---
    let collector = wiring::build_collector(&config, pool)?;
    let mut scheduler = Scheduler::new(config.overlap);
    poller::start_polling(
        &mut scheduler,
        collector,
        config.locations.clone(),
        config.cadence,
    )?;

    shutdown_signal().await;

    poller::drain(&mut scheduler, SHUTDOWN_GRACE).await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}
