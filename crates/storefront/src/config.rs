//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `EASYBUY_API_URL` - Base URL of the Easy Buy backend (e.g., <https://api.easybuy.example>)
//!
//! ## Optional
//! - `EASYBUY_REQUEST_TIMEOUT_SECS` - Overall HTTP request timeout (default: 30)
//! - `EASYBUY_STORAGE_PATH` - Path for the persistent state file; when unset,
//!   state lives in memory only and does not survive a restart

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default overall HTTP request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the Easy Buy backend API
    pub api_base_url: Url,
    /// Overall timeout applied to every HTTP request
    pub request_timeout: Duration,
    /// Location of the persistent state file; `None` keeps state in memory
    pub storage_path: Option<PathBuf>,
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the base URL.
    #[must_use]
    pub const fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            storage_path: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = get_required_env("EASYBUY_API_URL")?
            .parse::<Url>()
            .map_err(|e| ConfigError::InvalidEnvVar("EASYBUY_API_URL".to_string(), e.to_string()))?;

        let request_timeout = get_env_or_default("EASYBUY_REQUEST_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| {
                ConfigError::InvalidEnvVar("EASYBUY_REQUEST_TIMEOUT_SECS".to_string(), e.to_string())
            })?;

        let storage_path = get_optional_env("EASYBUY_STORAGE_PATH").map(PathBuf::from);

        Ok(Self {
            api_base_url,
            request_timeout,
            storage_path,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
