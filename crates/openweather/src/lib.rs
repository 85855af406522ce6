//! OpenWeatherMap source client.
//!
//! [`OpenWeatherClient`] implements
//! [`ReadingSource`](weatherwatch_core::collection::ReadingSource) over the
//! provider's current-weather endpoint. Provider conventions (Kelvin
//! temperatures, error codes embedded in a 200 body) are translated here and
//! never leak past this crate.

pub mod client;
pub mod payload;

pub use client::{OpenWeatherClient, OpenWeatherError};
