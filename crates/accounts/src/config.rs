//! Account system configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TALLYASSIST_STORAGE_PATH` - Storage scope file (default: `.tallyassist/storage.json`)
//! - `TALLYASSIST_PASSWORD_SCHEME` - `argon2` or `legacy` (default: `argon2`)
//! - `TALLYASSIST_RESET_TOKEN_TTL_SECS` - Reset token lifetime in seconds (default: 3600)
//! - `TALLYASSIST_DEFAULT_PLAN` - Plan label for new accounts (default: `Premium Plan`)

use std::path::PathBuf;

use chrono::{TimeDelta, Utc};
use thiserror::Error;

use tallyassist_core::Plan;

use crate::password::PasswordScheme;
use crate::store::StoreSettings;

const DEFAULT_STORAGE_PATH: &str = ".tallyassist/storage.json";
const DEFAULT_RESET_TOKEN_TTL_SECS: &str = "3600";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Account system configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountsConfig {
    /// Where the file-backed storage scope lives.
    pub storage_path: PathBuf,
    /// Store tunables.
    pub settings: StoreSettings,
}

impl AccountsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an unusable value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage_path = PathBuf::from(get_or("TALLYASSIST_STORAGE_PATH", DEFAULT_STORAGE_PATH));

        let password_scheme = get_or("TALLYASSIST_PASSWORD_SCHEME", "argon2")
            .parse::<PasswordScheme>()
            .map_err(|e| ConfigError::InvalidEnvVar("TALLYASSIST_PASSWORD_SCHEME".to_string(), e))?;

        let ttl_secs = get_or("TALLYASSIST_RESET_TOKEN_TTL_SECS", DEFAULT_RESET_TOKEN_TTL_SECS)
            .parse::<i64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "TALLYASSIST_RESET_TOKEN_TTL_SECS".to_string(),
                    e.to_string(),
                )
            })?;
        let reset_token_ttl = TimeDelta::try_seconds(ttl_secs)
            .filter(|ttl| *ttl > TimeDelta::zero())
            .ok_or_else(|| {
                ConfigError::InvalidEnvVar(
                    "TALLYASSIST_RESET_TOKEN_TTL_SECS".to_string(),
                    format!("must be a positive number of seconds (got {ttl_secs})"),
                )
            })?;
        if Utc::now().checked_add_signed(reset_token_ttl).is_none() {
            return Err(ConfigError::InvalidEnvVar(
                "TALLYASSIST_RESET_TOKEN_TTL_SECS".to_string(),
                format!("expiry date out of range (got {ttl_secs})"),
            ));
        }

        let default_plan = lookup("TALLYASSIST_DEFAULT_PLAN")
            .filter(|plan| !plan.trim().is_empty())
            .map_or_else(Plan::default, Plan::new);

        Ok(Self {
            storage_path,
            settings: StoreSettings {
                reset_token_ttl,
                default_plan,
                password_scheme,
            },
        })
    }
}
