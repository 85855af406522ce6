//! Assembly of the production collection cycle.

use std::sync::Arc;

use anyhow::Context;
use weatherwatch_core::clock::ObservationClock;
use weatherwatch_core::config::MonitorConfig;
use weatherwatch_db::{DbPool, PgReadingStore};
use weatherwatch_events::{AlertDispatcher, EmailConfig, EmailDelivery, WebhookDelivery};
use weatherwatch_openweather::OpenWeatherClient;
use weatherwatch_pipeline::CollectionCycle;

/// The collection cycle as wired in production.
pub type Collector = CollectionCycle<OpenWeatherClient, PgReadingStore, AlertDispatcher>;

/// Connect to `DATABASE_URL`, verify it answers, and apply migrations.
pub async fn connect_database() -> anyhow::Result<DbPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = weatherwatch_db::create_pool(&database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    weatherwatch_db::health_check(&pool)
        .await
        .context("Database health check failed")?;
    tracing::info!("Database health check passed");

    weatherwatch_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}

/// Build the notifier from whichever channels are configured.
///
/// * `email` - SMTP settings; alerts go to `recipient`.
/// * `webhook_url` - endpoint receiving the JSON alert payload.
pub fn build_dispatcher(
    recipient: &str,
    email: Option<EmailConfig>,
    webhook_url: Option<String>,
) -> anyhow::Result<AlertDispatcher> {
    let mut dispatcher = AlertDispatcher::new();

    if let Some(email) = email {
        tracing::info!(smtp_host = %email.smtp_host, recipient, "Email alerts enabled");
        let delivery = EmailDelivery::new(email).context("Invalid SMTP configuration")?;
        dispatcher = dispatcher.with_email(delivery, recipient);
    }

    if let Some(url) = webhook_url.filter(|u| !u.trim().is_empty()) {
        tracing::info!(url = %url, "Webhook alerts enabled");
        let delivery = WebhookDelivery::new().context("Failed to build webhook client")?;
        dispatcher = dispatcher.with_webhook(delivery, url);
    }

    if dispatcher.channel_count() == 0 {
        tracing::warn!("No alert channel configured; alerts will only be logged");
    }

    Ok(dispatcher)
}

/// Wire source, store, and notifier into a [`Collector`].
///
/// Email and webhook settings are read from the environment
/// (`SMTP_*`, `ALERT_WEBHOOK_URL`).
pub fn build_collector(config: &MonitorConfig, pool: DbPool) -> anyhow::Result<Collector> {
    let clock = Arc::new(ObservationClock::new());
    let source = OpenWeatherClient::new(&config.base_url, &config.api_key, clock)
        .context("Failed to build OpenWeatherMap client")?;
    let store = PgReadingStore::new(pool);
    let notifier = build_dispatcher(
        &config.notify_recipient,
        EmailConfig::from_env()?,
        std::env::var("ALERT_WEBHOOK_URL").ok(),
    )?;

    Ok(CollectionCycle::new(
        Arc::new(source),
        Arc::new(store),
        Arc::new(notifier),
        config.alert_threshold,
        config.call_timeout,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatcher_without_channels_is_log_only() {
        let dispatcher = build_dispatcher("ops@example.com", None, None).unwrap();
        assert_eq!(dispatcher.channel_count(), 0);
    }

    #[test]
    fn blank_webhook_url_is_ignored() {
        let dispatcher =
            build_dispatcher("ops@example.com", None, Some("  ".to_string())).unwrap();
        assert_eq!(dispatcher.channel_count(), 0);
    }

    #[tokio::test]
    async fn configured_channels_are_attached() {
        let email = EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            from_address: "alerts@example.com".to_string(),
            smtp_user: None,
            smtp_password: None,
        };
        let dispatcher = build_dispatcher(
            "ops@example.com",
            Some(email),
            Some("https://hooks.example.com/weather".to_string()),
        )
        .unwrap();
        assert_eq!(dispatcher.channel_count(), 2);
    }
}
