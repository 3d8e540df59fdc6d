//! API client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `WILDMINT_API_URL` - Base URL of the Wildmint REST API
//!
//! ## Optional
//! - `WILDMINT_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 30)
//! - `WILDMINT_SESSION_FILE` - Path for the persisted session token
//!   (default: `.wildmint-session.json` in the working directory)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default session token file, relative to the working directory.
const DEFAULT_SESSION_FILE: &str = ".wildmint-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// API client configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the REST API. Trailing slashes are normalized away
    /// when endpoints are joined.
    pub base_url: Url,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Where the session token is persisted.
    pub session_file: PathBuf,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `WILDMINT_API_URL` is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = get_required_env("WILDMINT_API_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("WILDMINT_API_URL".to_string(), e.to_string())
            })?;
        let timeout_secs = get_env_or_default(
            "WILDMINT_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("WILDMINT_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        let session_file =
            PathBuf::from(get_env_or_default("WILDMINT_SESSION_FILE", DEFAULT_SESSION_FILE));

        Ok(Self {
            base_url,
            timeout: Duration::from_secs(timeout_secs),
            session_file,
        })
    }

    /// Build a configuration for a known base URL with defaults elsewhere.
    #[must_use]
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
