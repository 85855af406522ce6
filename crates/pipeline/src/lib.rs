//! The collection-and-alerting pipeline.
//!
//! - [`cycle::CollectionCycle`] -- one fan-out/fan-in pass over a set of
//!   locations: fetch, persist, evaluate, notify, with per-location failure
//!   isolation.
//! - [`scheduler::Scheduler`] -- fires a cycle at a fixed cadence.
//! - [`summary::SummaryService`] -- windowed temperature statistics computed
//!   by the store.

pub mod cycle;
pub mod scheduler;
pub mod summary;

pub use cycle::{CollectionCycle, CycleReport, LocationOutcome, LocationReport};
pub use scheduler::{Scheduler, SchedulerError, SchedulerState};
pub use summary::SummaryService;
