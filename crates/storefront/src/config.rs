//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TAVOLA_DATA_DIR` - Directory for persisted cart/favorites (default: .tavola)
//! - `TAVOLA_TENANTS_FILE` - JSON tenant list (default: built-in list)
//! - `TAVOLA_TENANT_PARAM` - Query parameter carrying the tenant slug (default: merchant)
//! - `TAVOLA_TABLE_PARAM` - Query parameter carrying the table number (default: table)
//! - `TAVOLA_BASE_URL` - Base for resolving relative URLs (default: <http://localhost/>)
//! - `TAVOLA_CURRENCY` - Display currency for prices (default: EUR)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use tavola_core::CurrencyCode;

use crate::tenant::{DEFAULT_TABLE_PARAM, DEFAULT_TENANT_PARAM, ResolverParams};

const DEFAULT_BASE_URL: &str = "http://localhost/";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding `cart.json` and `favorites.json`
    pub data_dir: PathBuf,
    /// Tenant list file; `None` uses the built-in list
    pub tenants_file: Option<PathBuf>,
    /// Query parameter names used by the tenant resolver
    pub resolver: ResolverParams,
    /// Base URL that relative URLs are resolved against
    pub base_url: Url,
    /// Currency used when displaying prices
    pub currency: CurrencyCode,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".tavola"),
            tenants_file: None,
            resolver: ResolverParams::default(),
            base_url: default_base_url(),
            currency: CurrencyCode::default(),
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
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let data_dir = PathBuf::from(get_env_or_default("TAVOLA_DATA_DIR", ".tavola"));
        let tenants_file = get_optional_env("TAVOLA_TENANTS_FILE").map(PathBuf::from);
        let resolver = ResolverParams {
            tenant_param: get_param_name("TAVOLA_TENANT_PARAM", DEFAULT_TENANT_PARAM)?,
            table_param: get_param_name("TAVOLA_TABLE_PARAM", DEFAULT_TABLE_PARAM)?,
        };
        let base_url = match get_optional_env("TAVOLA_BASE_URL") {
            Some(raw) => Url::parse(&raw).map_err(|e| {
                ConfigError::InvalidEnvVar("TAVOLA_BASE_URL".to_string(), e.to_string())
            })?,
            None => default_base_url(),
        };
        let currency = get_env_or_default("TAVOLA_CURRENCY", "EUR")
            .parse::<CurrencyCode>()
            .map_err(|e| ConfigError::InvalidEnvVar("TAVOLA_CURRENCY".to_string(), e))?;

        Ok(Self {
            data_dir,
            tenants_file,
            resolver,
            base_url,
            currency,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn default_base_url() -> Url {
    Url::parse(DEFAULT_BASE_URL).expect("Invalid default base URL")
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get a query parameter name; must be non-blank.
fn get_param_name(key: &str, default: &str) -> Result<String, ConfigError> {
    let value = get_env_or_default(key, default);
    if value.trim().is_empty() {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "parameter name cannot be blank".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::{Mutex, PoisonError};

    use super::*;

    const VARS: [&str; 6] = [
        "TAVOLA_DATA_DIR",
        "TAVOLA_TENANTS_FILE",
        "TAVOLA_TENANT_PARAM",
        "TAVOLA_TABLE_PARAM",
        "TAVOLA_BASE_URL",
        "TAVOLA_CURRENCY",
    ];

    /// Serializes tests that touch the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Run `from_env` with exactly `vars` set among the Tavola variables.
    #[allow(unsafe_code)]
    fn from_env_with(vars: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let _guard = ENV_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        // SAFETY: ENV_LOCK keeps other tests in this crate off the environment.
        unsafe {
            for key in VARS {
                std::env::remove_var(key);
            }
            for (key, value) in vars {
                std::env::set_var(key, value);
            }
        }
        let result = StorefrontConfig::from_env();
        // SAFETY: as above.
        unsafe {
            for key in VARS {
                std::env::remove_var(key);
            }
        }
        result
    }

    #[test]
    fn test_defaults() {
        let config = StorefrontConfig::default();
        assert_eq!(config.data_dir, PathBuf::from(".tavola"));
        assert!(config.tenants_file.is_none());
        assert_eq!(config.resolver.tenant_param, "merchant");
        assert_eq!(config.resolver.table_param, "table");
        assert_eq!(config.base_url.as_str(), "http://localhost/");
        assert_eq!(config.currency, CurrencyCode::EUR);
    }

    #[test]
    fn test_blank_param_name_rejected() {
        let result = get_param_name("TAVOLA_TEST_UNSET_PARAM_NAME", "  ");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_param_name_default() {
        let result = get_param_name("TAVOLA_TEST_UNSET_PARAM_NAME", "merchant").unwrap();
        assert_eq!(result, "merchant");
    }

    #[test]
    fn test_from_env_reads_every_variable() {
        let config = from_env_with(&[
            ("TAVOLA_DATA_DIR", "/var/lib/tavola"),
            ("TAVOLA_TENANTS_FILE", "/etc/tavola/tenants.json"),
            ("TAVOLA_TENANT_PARAM", "r"),
            ("TAVOLA_TABLE_PARAM", "t"),
            ("TAVOLA_BASE_URL", "https://tavola.app/"),
            ("TAVOLA_CURRENCY", "usd"),
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/var/lib/tavola"));
        assert_eq!(
            config.tenants_file,
            Some(PathBuf::from("/etc/tavola/tenants.json"))
        );
        assert_eq!(config.resolver.tenant_param, "r");
        assert_eq!(config.resolver.table_param, "t");
        assert_eq!(config.base_url.as_str(), "https://tavola.app/");
        assert_eq!(config.currency, CurrencyCode::USD);
    }

    #[test]
    fn test_from_env_empty_values_count_as_unset() {
        let config = from_env_with(&[
            ("TAVOLA_DATA_DIR", ""),
            ("TAVOLA_TENANTS_FILE", ""),
            ("TAVOLA_TENANT_PARAM", ""),
            ("TAVOLA_TABLE_PARAM", ""),
            ("TAVOLA_BASE_URL", ""),
            ("TAVOLA_CURRENCY", ""),
        ])
        .unwrap();

        let defaults = StorefrontConfig::default();
        assert_eq!(config.data_dir, defaults.data_dir);
        assert!(config.tenants_file.is_none());
        assert_eq!(config.resolver, defaults.resolver);
        assert_eq!(config.base_url, defaults.base_url);
        assert_eq!(config.currency, defaults.currency);
    }

    #[test]
    fn test_from_env_invalid_base_url() {
        let result = from_env_with(&[("TAVOLA_BASE_URL", "not a url")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "TAVOLA_BASE_URL"
        ));
    }

    #[test]
    fn test_from_env_unknown_currency() {
        let result = from_env_with(&[("TAVOLA_CURRENCY", "XYZ")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "TAVOLA_CURRENCY"
        ));
    }

    #[test]
    fn test_from_env_blank_param_name() {
        let result = from_env_with(&[("TAVOLA_TABLE_PARAM", "   ")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar(ref key, _)) if key == "TAVOLA_TABLE_PARAM"
        ));
    }
}
