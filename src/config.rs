//! Client configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local development.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Minimum age accepted by onboarding.
pub const DEFAULT_MIN_AGE: u32 = 18;

/// Client configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the profile/auth directory API
    pub api_base_url: String,
    /// On-device storage file (session + shadow profiles)
    pub store_path: PathBuf,
    /// Per-request timeout for directory calls
    pub request_timeout: Duration,
    /// Minimum age in whole years for onboarding
    pub min_age: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080".to_string(),
            store_path: PathBuf::from(".urbane/storage.json"),
            request_timeout: Duration::from_secs(10),
            min_age: DEFAULT_MIN_AGE,
        }
    }
}

impl Config {
    /// Default config for tests.
    pub fn test_default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:9".to_string(),
            store_path: env::temp_dir().join("urbane-test-storage.json"),
            request_timeout: Duration::from_secs(2),
            min_age: DEFAULT_MIN_AGE,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = Self::default();

        let request_timeout = match env::var("REQUEST_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::Invalid("REQUEST_TIMEOUT_SECS", raw.clone()))?,
            ),
            Err(_) => defaults.request_timeout,
        };

        let min_age = match env::var("MIN_AGE") {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("MIN_AGE", raw.clone()))?,
            Err(_) => defaults.min_age,
        };

        Ok(Self {
            api_base_url: env::var("API_BASE_URL")
                .map(|v| v.trim().trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            store_path: env::var("URBANE_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            request_timeout,
            min_age,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
