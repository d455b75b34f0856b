//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `login_url` is empty or not http(s)
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `cache_ttl_days` is outside 1..=30
    /// - `max_result_pages` is outside 1..=50
    /// - `user_agent` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.login_url.starts_with("http://") && !self.login_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                field: "login_url".into(),
                reason: "must be an http(s) URL".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if !(1..=30).contains(&self.cache_ttl_days) {
            return Err(ConfigError::Invalid {
                field: "cache_ttl_days".into(),
                reason: "must be between 1 and 30 days".into(),
            });
        }

        if !(1..=50).contains(&self.max_result_pages) {
            return Err(ConfigError::Invalid {
                field: "max_result_pages".into(),
                reason: "must be between 1 and 50 pages".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        Ok(())
    }
}
