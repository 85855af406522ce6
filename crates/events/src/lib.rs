//! Alert notification infrastructure.
//!
//! - [`TemperatureAlert`] -- the payload describing one threshold crossing.
//! - [`delivery`] -- external delivery channels (email, webhook).
//! - [`AlertDispatcher`] -- the pipeline's
//!   [`Notifier`](weatherwatch_core::collection::Notifier), fanning an alert
//!   out to every configured channel.

pub mod alert;
pub mod delivery;
pub mod dispatcher;

pub use alert::TemperatureAlert;
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::webhook::WebhookDelivery;
pub use dispatcher::AlertDispatcher;
