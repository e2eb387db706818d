//! Startup configuration
//!
//! Loaded once from a TOML file; every part of it is immutable for the
//! life of the process. The first `[[tenant]]` block is the primary
//! routing fallback for submissions without a recognised brand.

use std::path::Path;

use herald_common::TenantConfig;
use herald_dispatch::DispatcherConfig;
use herald_http::HttpConfig;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The full herald configuration.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Sending brands, in priority order.
    #[serde(rename = "tenant")]
    pub tenants: Vec<TenantConfig>,

    /// HTTP surface settings.
    #[serde(default)]
    pub http: HttpConfig,

    /// Worker loop tunables.
    #[serde(default)]
    pub dispatcher: DispatcherConfig,
}

impl Config {
    /// Load and parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [http]
        listen_address = "127.0.0.1:5000"

        [dispatcher]
        backoff_interval_secs = 30

        [[tenant]]
        name = "Talrn"
        server = "b.trytalrn.example"
        user = "hire@b.trytalrn.example"
        pass = "secret-one"
        logo = "Talrn logo.png"
        cid = "talrn_logo"

        [[tenant]]
        name = "Leadersfirst"
        server = "t.tryleadersfirst.example"
        user = "reach@t.tryleadersfirst.example"
        pass = "secret-two"
        logo = "leaderslogo.png"
        cid = "leaders_logo"
        limit = 200
        window_secs = 1800
    "#;

    #[test]
    fn parses_a_full_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();

        assert_eq!(config.tenants.len(), 2);
        assert_eq!(config.tenants[0].name, "Talrn");
        assert_eq!(config.tenants[0].limit, 150);
        assert_eq!(config.tenants[0].window_secs, 3600);
        assert_eq!(config.tenants[1].limit, 200);
        assert_eq!(config.tenants[1].window_secs, 1800);
        assert_eq!(config.http.listen_address, "127.0.0.1:5000");
        assert_eq!(config.dispatcher.idle_interval_secs, 1);
        assert_eq!(config.dispatcher.backoff_interval_secs, 30);
    }

    #[test]
    fn sections_default_when_absent() {
        let config: Config = toml::from_str(
            r#"
            [[tenant]]
            name = "Talrn"
            server = "b.trytalrn.example"
            user = "hire@b.trytalrn.example"
            pass = "secret-one"
            cid = "talrn_logo"
            "#,
        )
        .unwrap();

        assert_eq!(config.http.listen_address, "[::]:5000");
        assert_eq!(config.dispatcher.idle_interval_secs, 1);
        assert_eq!(config.dispatcher.backoff_interval_secs, 10);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = Config::from_path("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
