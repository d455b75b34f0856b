//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (CASEFINDER_*)
//! 2. TOML config file (if CASEFINDER_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (CASEFINDER_*)
/// 2. TOML config file (if CASEFINDER_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite store (response cache + case items).
    ///
    /// Set via CASEFINDER_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Vendor login endpoint.
    ///
    /// Set via CASEFINDER_LOGIN_URL environment variable.
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// User-Agent string for vendor requests.
    ///
    /// Set via CASEFINDER_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via CASEFINDER_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Days a cached vendor response stays servable.
    ///
    /// Set via CASEFINDER_CACHE_TTL_DAYS environment variable.
    #[serde(default = "default_cache_ttl_days")]
    pub cache_ttl_days: i64,

    /// Hard ceiling on pages fetched for one logical query.
    ///
    /// The vendor bills per query, so an unbounded walk of a huge result
    /// set is an operational hazard. Set via CASEFINDER_MAX_RESULT_PAGES.
    #[serde(default = "default_max_result_pages")]
    pub max_result_pages: usize,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./casefinder-store.sqlite")
}

fn default_login_url() -> String {
    "https://login.publicdata.com/pdmain.php/logon/checkAccess".into()
}

fn default_user_agent() -> String {
    "casefinder/0.1".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_cache_ttl_days() -> i64 {
    3
}

fn default_max_result_pages() -> usize {
    10
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            login_url: default_login_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            cache_ttl_days: default_cache_ttl_days(),
            max_result_pages: default_max_result_pages(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL in seconds, the unit the store works in.
    pub fn cache_ttl_seconds(&self) -> i64 {
        self.cache_ttl_days * 24 * 60 * 60
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `CASEFINDER_`
    /// 2. TOML file from `CASEFINDER_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("CASEFINDER_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("CASEFINDER_")
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.db_path, PathBuf::from("./casefinder-store.sqlite"));
        assert_eq!(config.user_agent, "casefinder/0.1");
        assert_eq!(config.timeout_ms, 20_000);
        assert_eq!(config.cache_ttl_days, 3);
        assert_eq!(config.max_result_pages, 10);
        assert!(config.login_url.starts_with("https://"));
    }

    #[test]
    fn test_timeout_duration() {
        let config = AppConfig::default();
        assert_eq!(config.timeout(), Duration::from_millis(20_000));
    }

    #[test]
    fn test_ttl_conversion() {
        let config = AppConfig::default();
        assert_eq!(config.cache_ttl_seconds(), 259_200);
    }
}
