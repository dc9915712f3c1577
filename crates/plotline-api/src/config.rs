//! Server configuration read from the environment.

use std::time::Duration;

use plotline_sync::DEFAULT_DEBOUNCE;

use crate::error::AppError;

/// Startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Quiet period before an automatic flush.
    pub save_debounce: Duration,
    /// Simulated latency of the in-memory store.
    pub store_latency: Duration,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is present but invalid.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => 3000,
        };
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let save_debounce = millis(&lookup, "SAVE_DEBOUNCE_MS")?.unwrap_or(DEFAULT_DEBOUNCE);
        let store_latency = millis(&lookup, "STORE_LATENCY_MS")?.unwrap_or(Duration::ZERO);

        Ok(Self {
            host,
            port,
            database_url,
            save_debounce,
            store_latency,
        })
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<Duration>, AppError> {
    lookup(key)
        .map(|raw| {
            raw.parse::<u64>().map(Duration::from_millis).map_err(|e| {
                AppError::Config(format!("{key} must be a whole number of milliseconds: {e}"))
            })
        })
        .transpose()
}
