//! Configuration management for the RMC inventory reporting gateway
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with RMC_ prefix

use std::time::Duration;

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::reports::{DEFAULT_WINDOW_DAYS, RECENT_MOVEMENTS_LIMIT};

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Upstream inventory service
    pub upstream: UpstreamConfig,

    /// Report defaults
    pub reports: ReportsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamConfig {
    /// Base URL of the inventory REST service, without the `/api` suffix
    pub base_url: String,

    /// Bearer token sent with every upstream request, if set
    pub api_token: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportsConfig {
    /// Trailing window for stock in/out totals when a request gives none
    pub default_window_days: u32,

    /// Rows in the recent movements report
    pub recent_movements_limit: usize,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("RMC_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("upstream.base_url", "http://localhost:8000")?
            .set_default("upstream.timeout_secs", 10)?
            .set_default("reports.default_window_days", i64::from(DEFAULT_WINDOW_DAYS))?
            .set_default("reports.recent_movements_limit", RECENT_MOVEMENTS_LIMIT as i64)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (RMC_ prefix)
            .add_source(
                Environment::with_prefix("RMC")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            default_window_days: DEFAULT_WINDOW_DAYS,
            recent_movements_limit: RECENT_MOVEMENTS_LIMIT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_defaults() {
        let config = Config::load().unwrap();
        assert_eq!(config.reports.default_window_days, 7);
        assert_eq!(config.reports.recent_movements_limit, 20);
        assert!(!config.upstream.base_url.is_empty());
    }

    #[test]
    fn test_upstream_timeout() {
        let upstream = UpstreamConfig {
            base_url: "http://localhost:8000".to_string(),
            api_token: None,
            timeout_secs: 15,
        };
        assert_eq!(upstream.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_server_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.port, 3000);
        assert_eq!(server.host, "0.0.0.0");
    }
}
