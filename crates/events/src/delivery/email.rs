//! Email alert delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send
//! plain-text alert emails. Configuration is loaded from environment
//! variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`] returns
//! `Ok(None)` and no mailer should be constructed.

use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use weatherwatch_core::error::CoreError;

use crate::alert::TemperatureAlert;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "alerts@weatherwatch.local";

/// Upper bound on a single SMTP conversation.
const SMTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// SMTP server hostname.
    pub smtp_host: String,
    /// SMTP server port (defaults to 587).
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    /// Optional SMTP username.
    pub smtp_user: Option<String>,
    /// Optional SMTP password.
    pub smtp_password: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `Ok(None)` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped. A malformed
    /// `SMTP_PORT` is a validation error.
    ///
    /// | Variable        | Required | Default                      |
    /// |-----------------|----------|------------------------------|
    /// | `SMTP_HOST`     | yes      | --                           |
    /// | `SMTP_PORT`     | no       | `587`                        |
    /// | `SMTP_FROM`     | no       | `alerts@weatherwatch.local`  |
    /// | `SMTP_USER`     | no       | --                           |
    /// | `SMTP_PASSWORD` | no       | --                           |
    pub fn from_env() -> Result<Option<Self>, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Option<Self>, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(smtp_host) = lookup("SMTP_HOST").filter(|h| !h.trim().is_empty()) else {
            return Ok(None);
        };

        let smtp_port = match lookup("SMTP_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                CoreError::Validation(format!("SMTP_PORT must be a valid u16, got '{raw}'"))
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(Some(Self {
            smtp_host,
            smtp_port,
            from_address: lookup("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: lookup("SMTP_USER"),
            smtp_password: lookup("SMTP_PASSWORD"),
        }))
    }
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends alert emails via SMTP.
///
/// The transport is built once and reused; `lettre` pools connections
/// internally.
pub struct EmailDelivery {
    from_address: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailDelivery {
    /// Create a new email delivery service with the given configuration.
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
                .port(config.smtp_port)
                .timeout(Some(SMTP_TIMEOUT));

        if let (Some(user), Some(pass)) = (config.smtp_user, config.smtp_password) {
            transport_builder = transport_builder.credentials(Credentials::new(user, pass));
        }

        Ok(Self {
            from_address: config.from_address,
            mailer: transport_builder.build(),
        })
    }

    /// Send an alert email to the specified address.
    pub async fn deliver(&self, to_email: &str, alert: &TemperatureAlert) -> Result<(), EmailError> {
        let email = build_message(&self.from_address, to_email, alert)?;
        self.mailer.send(email).await?;

        tracing::info!(to = to_email, location = %alert.location, "Alert email sent");
        Ok(())
    }
}

/// Assemble the MIME message for an alert.
fn build_message(
    from_address: &str,
    to_email: &str,
    alert: &TemperatureAlert,
) -> Result<Message, EmailError> {
    Message::builder()
        .from(from_address.parse()?)
        .to(to_email.parse()?)
        .subject(alert.subject())
        .header(ContentType::TEXT_PLAIN)
        .body(alert.body())
        .map_err(|e| EmailError::Build(e.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
