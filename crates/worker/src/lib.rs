//! Process bootstrap shared by the `weatherwatch-worker` and
//! `weatherwatch-api` binaries.
//!
//! - [`telemetry`] installs the tracing subscriber.
//! - [`wiring`] connects the database and assembles the collection cycle
//!   from configuration.
//! - [`poller`] drives that cycle from a [`Scheduler`](weatherwatch_pipeline::Scheduler)
//!   and drains it on shutdown.
//! - [`shutdown`] waits for SIGINT/SIGTERM.

pub mod poller;
pub mod shutdown;
pub mod telemetry;
pub mod wiring;
