//! Storefront client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MLK_API_BASE_URL` - REST API base URL (default: `http://localhost:9000/api`)
//! - `MLK_ASSET_BASE_URL` - Prefix for `/api/...` image paths (default: none, paths stay relative)
//! - `MLK_STORAGE_DIR` - Directory for the file-backed store (default: `.mlk-shop`)
//! - `MLK_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "http://localhost:9000/api";
const DEFAULT_STORAGE_DIR: &str = ".mlk-shop";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorefrontConfig {
    /// Base URL every API path is resolved against.
    pub api_base_url: Url,
    /// Base URL for server-hosted images.
    pub asset_base_url: Option<Url>,
    /// Where the file-backed key-value store keeps its entries.
    pub storage_dir: PathBuf,
    /// Per-request timeout.
    pub http_timeout: Duration,
}

impl StorefrontConfig {
    /// Configuration for `api_base_url` with every other setting at its default.
    #[must_use]
    pub fn new(api_base_url: Url) -> Self {
        Self {
            api_base_url,
            asset_base_url: None,
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = parse_url(
            "MLK_API_BASE_URL",
            &get_env_or_default(&lookup, "MLK_API_BASE_URL", DEFAULT_API_BASE_URL),
        )?;
        let asset_base_url = get_optional_env(&lookup, "MLK_ASSET_BASE_URL")
            .map(|value| parse_url("MLK_ASSET_BASE_URL", &value))
            .transpose()?;
        let storage_dir = PathBuf::from(get_env_or_default(
            &lookup,
            "MLK_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));
        let timeout_secs = get_env_or_default(
            &lookup,
            "MLK_HTTP_TIMEOUT_SECS",
            &DEFAULT_HTTP_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("MLK_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "MLK_HTTP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            api_base_url,
            asset_base_url,
            storage_dir,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Use a different API base URL.
    #[must_use]
    pub fn with_api_base_url(mut self, url: Url) -> Self {
        self.api_base_url = url;
        self
    }

    /// Use a different storage directory.
    #[must_use]
    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable. Empty values count as unset.
fn get_optional_env<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Get a variable with a default value.
fn get_env_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    get_optional_env(lookup, key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}
