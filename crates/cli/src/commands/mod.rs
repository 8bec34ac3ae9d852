//! Command implementations.
//!
//! Every command opens the configured file store, runs one operation and
//! prints its outcome, either as a plain message or as the JSON envelope.
//!
//! # Environment Variables
//!
//! See [`tallyassist_accounts::config`].

mod account;
mod reset;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

use tallyassist_accounts::{
    AccountError, AccountsConfig, ConfigError, CredentialStore, FileStore, Outcome,
    PasswordPolicy,
};
use tallyassist_core::{Email, Username};

/// Errors that stop a command before it produces an outcome.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The store failed for a non-business reason (storage, hashing).
    #[error(transparent)]
    Accounts(#[from] AccountError),

    /// JSON output could not be produced.
    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    /// The interactive password prompt failed.
    #[error("Failed to read password: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// The `--password` value if one was passed, otherwise a hidden prompt.
pub fn read_password(flag: Option<String>, confirm: bool) -> Result<SecretString, CliError> {
    if let Some(password) = flag {
        return Ok(password.into());
    }

    let mut prompt = dialoguer::Password::new().with_prompt("Password");
    if confirm {
        prompt = prompt.with_confirmation("Confirm password", "Passwords do not match");
    }
    Ok(prompt.interact()?.into())
}

/// Shared state for a single CLI invocation.
pub struct Context {
    store: CredentialStore<FileStore>,
    json: bool,
}

impl Context {
    /// Load configuration and open the storage scope it names.
    pub fn from_env(json: bool) -> Result<Self, CliError> {
        let config = AccountsConfig::from_env()?;
        tracing::debug!(path = %config.storage_path.display(), "Opening account storage");

        let store = CredentialStore::open(
            FileStore::new(config.storage_path),
            tallyassist_accounts::SystemClock,
            config.settings,
        )?;

        Ok(Self { store, json })
    }

    /// Print `outcome`, or `text` in plain mode, and return its success flag.
    fn emit<T: Serialize>(&self, outcome: &Outcome<T>, text: &str) -> Result<bool, CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(outcome)?);
        } else {
            println!("{text}");
        }
        Ok(outcome.success)
    }

    /// Print a failure that was caught before reaching the store.
    fn reject(&self, message: String) -> Result<bool, CliError> {
        let outcome: Outcome<()> = Outcome {
            success: false,
            message,
            user: None,
        };
        self.emit(&outcome, &outcome.message)
    }

    /// Reject passwords that fail the strength rules before touching the store.
    fn check_password(&self, password: &SecretString) -> Result<bool, CliError> {
        let unmet = PasswordPolicy.unmet(password.expose_secret());
        if unmet.is_empty() {
            return Ok(true);
        }

        let rules: Vec<String> = unmet.iter().map(ToString::to_string).collect();
        self.reject(format!(
            "Please ensure your password meets all requirements: {}",
            rules.join(", ")
        ))
    }

    /// Reject blank or oversized usernames and malformed emails. The store
    /// itself takes both as given.
    fn check_identity(&self, username: &str, email: &str) -> Result<bool, CliError> {
        if let Err(e) = Username::parse(username) {
            return self.reject(format!("Invalid username: {e}"));
        }
        if let Err(e) = Email::parse(email) {
            return self.reject(format!("Invalid email: {e}"));
        }
        Ok(true)
    }
}

/// Split business rejections (kept for display) from infrastructure failures.
fn settle<T>(result: Result<T, AccountError>) -> Result<Result<T, AccountError>, CliError> {
    match result {
        Err(e) if !e.is_rejection() => Err(e.into()),
        other => Ok(other),
    }
}

/// Plain-text line for `result`: `render` on success, the error message otherwise.
fn describe<T>(result: &Result<T, AccountError>, render: impl FnOnce(&T) -> String) -> String {
    match result {
        Ok(value) => render(value),
        Err(e) => e.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_password_flag_skips_prompt() {
        let password = read_password(Some("Secret123!".to_owned()), true).unwrap();
        assert_eq!(password.expose_secret(), "Secret123!");
    }

    #[test]
    fn test_settle_keeps_rejections() {
        let kept = settle::<()>(Err(AccountError::InvalidCredentials)).unwrap();
        assert!(matches!(kept, Err(AccountError::InvalidCredentials)));

        let raised = settle::<()>(Err(AccountError::TokenLifetime));
        assert!(matches!(raised, Err(CliError::Accounts(AccountError::TokenLifetime))));
    }
}
