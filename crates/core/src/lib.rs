//! Domain types and pure logic for the weatherwatch workspace.
//!
//! Nothing in this crate performs I/O. The collaborator seams
//! ([`collection::ReadingSource`], [`collection::ReadingStore`],
//! [`collection::Notifier`]) are declared here and implemented by the
//! adapter crates.

pub mod clock;
pub mod collection;
pub mod config;
pub mod error;
pub mod reading;
pub mod thresholds;
pub mod types;
