//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `AURORA_DATA_DIR` - Directory for the persistent store (default: `.aurora`)
//! - `AURORA_BADGE_DEBOUNCE_MS` - Badge debounce window in milliseconds (default: 10)
//! - `AURORA_CURRENCY_SYMBOL` - Symbol used when rendering prices (default: `₹`)
//! - `AURORA_BASE_URL` - Origin the demo shell navigates under (default: `https://aurora.example`)
//! - `AURORA_DATA_LAYER` - Path to a JSON-lines data-layer file; unset
//!   disables analytics emission entirely

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory backing the persistent key-value store.
    pub data_dir: PathBuf,
    /// Quiescent window for the debounced cart-count badge.
    pub badge_debounce: Duration,
    /// Currency symbol used by the cart renderer.
    pub currency_symbol: String,
    /// Origin for demo-shell navigation URLs.
    pub base_url: String,
    /// JSON-lines file the data layer appends to. `None` disables emission.
    pub data_layer_path: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".aurora"),
            badge_debounce: Duration::from_millis(10),
            currency_symbol: "₹".to_string(),
            base_url: "https://aurora.example".to_string(),
            data_layer_path: None,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparseable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let data_dir = get_optional_env("AURORA_DATA_DIR")
            .map_or(defaults.data_dir, PathBuf::from);
        let badge_debounce_ms = get_optional_env("AURORA_BADGE_DEBOUNCE_MS")
            .map(|raw| {
                raw.parse::<u64>().map_err(|e| {
                    ConfigError::InvalidEnvVar("AURORA_BADGE_DEBOUNCE_MS".to_string(), e.to_string())
                })
            })
            .transpose()?;
        let badge_debounce =
            badge_debounce_ms.map_or(defaults.badge_debounce, Duration::from_millis);
        let currency_symbol =
            get_optional_env("AURORA_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol);
        let base_url = get_optional_env("AURORA_BASE_URL").unwrap_or(defaults.base_url);
        let data_layer_path = get_optional_env("AURORA_DATA_LAYER").map(PathBuf::from);

        Ok(Self {
            data_dir,
            badge_debounce,
            currency_symbol,
            base_url,
            data_layer_path,
        })
    }
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(".aurora"));
        assert_eq!(config.badge_debounce, Duration::from_millis(10));
        assert_eq!(config.currency_symbol, "₹");
        assert!(config.data_layer_path.is_none());
    }
}
