use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Core settings
    pub listen_addr: String,
    pub database_url: String,
    pub debug: bool,

    // Provider settings
    pub ipstack_access_key: Option<String>,
    pub ipstack_base_url: String,
    pub provider_timeout_secs: u64,
    pub provider_deadline_secs: u64,

    // Store retry settings
    pub store_retry_attempts: usize,
    pub store_retry_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8000".to_string(),
            database_url: "geolocation.db".to_string(),
            debug: false,
            ipstack_access_key: None,
            ipstack_base_url: "https://api.ipstack.com".to_string(),
            provider_timeout_secs: 10,
            provider_deadline_secs: 30,
            store_retry_attempts: 5,
            store_retry_timeout_secs: 3,
        }
    }
}

impl Config {
    pub fn store_retry_timeout(&self) -> Duration {
        Duration::from_secs(self.store_retry_timeout_secs)
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }

    /// Total time a cache miss may wait on the provider, retries included.
    pub fn provider_deadline(&self) -> Duration {
        Duration::from_secs(self.provider_deadline_secs)
    }
}

/// Configuration loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("GEOCAT_DATABASE_URL is required")]
    MissingDatabaseUrl,
}

pub fn load_config() -> anyhow::Result<Config> {
    let database_url = std::env::var("GEOCAT_DATABASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingDatabaseUrl)?;

    let listen_addr = std::env::var("GEOCAT_LISTEN_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8000".to_string());

    let debug = std::env::var("DEBUG").is_ok();

    // Provider settings
    let ipstack_access_key = std::env::var("GEOCAT_IPSTACK_ACCESS_KEY")
        .ok()
        .filter(|v| !v.is_empty());

    let ipstack_base_url = std::env::var("GEOCAT_IPSTACK_BASE_URL")
        .unwrap_or_else(|_| "https://api.ipstack.com".to_string());

    let provider_timeout_secs = std::env::var("GEOCAT_PROVIDER_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse()
        .unwrap_or(10);

    let provider_deadline_secs = std::env::var("GEOCAT_PROVIDER_DEADLINE_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse()
        .unwrap_or(30);

    // Store retry settings
    let store_retry_attempts = std::env::var("GEOCAT_STORE_RETRY_ATTEMPTS")
        .unwrap_or_else(|_| "5".to_string())
        .parse()
        .unwrap_or(5);

    let store_retry_timeout_secs = std::env::var("GEOCAT_STORE_RETRY_TIMEOUT_SECS")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .unwrap_or(3);

    Ok(Config {
        listen_addr,
        database_url,
        debug,
        ipstack_access_key,
        ipstack_base_url,
        provider_timeout_secs,
        provider_deadline_secs,
        store_retry_attempts,
        store_retry_timeout_secs,
    })
}
