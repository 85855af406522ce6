use std::time::Duration;

use weatherwatch_core::error::CoreError;

/// Headroom left between the lookup deadline and the request timeout.
const LOOKUP_MARGIN: Duration = Duration::from_secs(1);

/// Shortest lookup deadline handed out, however small the request timeout.
const MIN_LOOKUP_TIMEOUT: Duration = Duration::from_millis(500);

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());

        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| CoreError::Validation(format!("PORT must be a valid u16, got '{raw}'")))?,
            None => 3000,
        };

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                CoreError::Validation(format!(
                    "REQUEST_TIMEOUT_SECS must be a valid u64, got '{raw}'"
                ))
            })?,
            None => 30,
        };
        if request_timeout_secs == 0 {
            return Err(CoreError::Validation(
                "REQUEST_TIMEOUT_SECS must be greater than zero".into(),
            ));
        }

        Ok(Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
        })
    }

    /// Deadline for an interactive lookup.
    ///
    /// Finishes before the request timeout layer fires, so a slow pipeline
    /// still answers with the placeholder view instead of a bare 408.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
            .saturating_sub(LOOKUP_MARGIN)
            .max(MIN_LOOKUP_TIMEOUT)
    }
}
