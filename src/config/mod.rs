//! Configuration module for the LinkIt backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::VaultDelays;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Base URL of the microlink-compatible metadata service
    pub metadata_url: String,
    /// Timeout for a single metadata request
    pub metadata_timeout: Duration,
    /// Phase lengths of the vault unlock prompt
    pub vault_delays: VaultDelays,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("LINKIT_API_PSK").ok();

        let db_path = env::var("LINKIT_DB_PATH")
            .unwrap_or_else(|_| "./data/links.sqlite".to_string())
            .into();

        let bind_addr = env::var("LINKIT_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid LINKIT_BIND_ADDR format");

        let log_level = env::var("LINKIT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let metadata_url = env::var("LINKIT_METADATA_URL")
            .unwrap_or_else(|_| "https://api.microlink.io".to_string());

        let metadata_timeout = millis_var("LINKIT_METADATA_TIMEOUT_MS", 8000);

        let defaults = VaultDelays::default();
        let vault_delays = VaultDelays {
            scan: millis_var("LINKIT_VAULT_SCAN_MS", defaults.scan.as_millis() as u64),
            settle: millis_var("LINKIT_VAULT_SETTLE_MS", defaults.settle.as_millis() as u64),
        };

        Self {
            api_psk,
            db_path,
            bind_addr,
            log_level,
            metadata_url,
            metadata_timeout,
            vault_delays,
        }
    }
}

fn millis_var(key: &str, default: u64) -> Duration {
    let millis = env::var(key)
        .map(|v| v.parse().unwrap_or_else(|_| panic!("Invalid {} value: {}", key, v)))
        .unwrap_or(default);
    Duration::from_millis(millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        for key in [
            "LINKIT_API_PSK",
            "LINKIT_DB_PATH",
            "LINKIT_BIND_ADDR",
            "LINKIT_LOG_LEVEL",
            "LINKIT_METADATA_URL",
            "LINKIT_METADATA_TIMEOUT_MS",
            "LINKIT_VAULT_SCAN_MS",
            "LINKIT_VAULT_SETTLE_MS",
        ] {
            env::remove_var(key);
        }

        let config = Config::from_env();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/links.sqlite"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.metadata_url, "https://api.microlink.io");
        assert_eq!(config.metadata_timeout, Duration::from_secs(8));
        assert_eq!(config.vault_delays, VaultDelays::default());
    }
}
