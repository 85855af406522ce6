use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Context;
use weatherwatch_api::config::ServerConfig;
use weatherwatch_api::router::build_app_router;
use weatherwatch_api::state::AppState;
use weatherwatch_core::config::MonitorConfig;
use weatherwatch_db::PgReadingStore;
use weatherwatch_pipeline::{Scheduler, SummaryService};
use weatherwatch_worker::poller::{self, SHUTDOWN_GRACE};
use weatherwatch_worker::shutdown::shutdown_signal;
use weatherwatch_worker::{telemetry, wiring};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init_tracing("weatherwatch_api=debug,weatherwatch_pipeline=debug,tower_http=debug,info");

    // --- Configuration ---
    let server_config = ServerConfig::from_env()?;
    let monitor_config = MonitorConfig::from_env()?;
    tracing::info!(host = %server_config.host, port = server_config.port, "Loaded server configuration");
    tracing::info!(config = ?monitor_config, "Loaded monitor configuration");

    // --- Database ---
    let pool = wiring::connect_database().await?;

    // --- Collection ---
    let collector = wiring::build_collector(&monitor_config, pool.clone())?;
    let mut scheduler = Scheduler::new(monitor_config.overlap);
    poller::start_polling(
        &mut scheduler,
        collector.clone(),
        monitor_config.locations.clone(),
        monitor_config.cadence,
    )?;

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        collector,
        lookup_timeout: server_config.lookup_timeout(),
        summaries: SummaryService::new(Arc::new(PgReadingStore::new(pool))),
    };
    let app = build_app_router(state, &server_config);

    // --- Start server ---
    let host = server_config
        .host
        .parse::<IpAddr>()
        .with_context(|| format!("Invalid HOST address '{}'", server_config.host))?;
    let addr = SocketAddr::new(host, server_config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining collection");
    poller::drain(&mut scheduler, SHUTDOWN_GRACE).await;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}
