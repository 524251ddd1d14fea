//! Cart configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `CART_API_URL` - Base URL of the catalog API (default: <http://localhost:3333>)
//! - `CART_API_TOKEN` - Bearer token sent to the catalog API
//! - `CART_API_TIMEOUT_SECS` - Request timeout in seconds (default: 30)
//! - `CART_PRODUCT_CACHE_TTL_SECS` - Product record cache TTL (default: 300)
//! - `CART_STORAGE_DIR` - Directory backing the key-value store (default: .rocketshoes)
//! - `CART_STORAGE_KEY` - Key the cart snapshot is stored under (default: @RocketShoes:cart)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Key the cart snapshot is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "@RocketShoes:cart";

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_STORAGE_DIR: &str = ".rocketshoes";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart application configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Catalog API configuration
    pub api: CatalogApiConfig,
    /// Directory backing the file store
    pub storage_dir: PathBuf,
    /// Key the cart snapshot is stored under
    pub storage_key: String,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// Catalog API configuration.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct CatalogApiConfig {
    /// Base URL, e.g. <http://localhost:3333>
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
    /// How long product records stay cached
    pub product_cache_ttl: Duration,
}

impl std::fmt::Debug for CatalogApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .field("product_cache_ttl", &self.product_cache_ttl)
            .finish()
    }
}

impl CatalogApiConfig {
    /// Configuration for `base_url` with default timeout and cache TTL.
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self {
            base_url,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            product_cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl CartConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Lookup(lookup);

        let base_url = env.or_default("CART_API_URL", DEFAULT_API_URL);
        let base_url = parse_base_url(&base_url)
            .map_err(|e| ConfigError::InvalidEnvVar("CART_API_URL".to_string(), e))?;

        let api = CatalogApiConfig {
            base_url,
            token: env
                .optional("CART_API_TOKEN")
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
            timeout: Duration::from_secs(
                env.parse_or("CART_API_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?,
            ),
            product_cache_ttl: Duration::from_secs(
                env.parse_or("CART_PRODUCT_CACHE_TTL_SECS", DEFAULT_CACHE_TTL_SECS)?,
            ),
        };

        if api.timeout.is_zero() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_API_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let storage_key = env.or_default("CART_STORAGE_KEY", DEFAULT_STORAGE_KEY);
        if storage_key.is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "CART_STORAGE_KEY".to_string(),
                "must not be empty".to_string(),
            ));
        }

        Ok(Self {
            api,
            storage_dir: PathBuf::from(env.or_default("CART_STORAGE_DIR", DEFAULT_STORAGE_DIR)),
            storage_key,
            sentry_dsn: env.optional("SENTRY_DSN"),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

struct Lookup<F>(F);

impl<F: Fn(&str) -> Option<String>> Lookup<F> {
    /// Get an optional variable.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable, falling back to `default` when unset.
    fn parse_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.optional(key).map_or(Ok(default), |raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
        })
    }
}

/// Parse the API base URL, forcing a trailing slash so relative joins keep
/// any path prefix (`http://host/api` + `stock/1` -> `http://host/api/stock/1`).
fn parse_base_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
