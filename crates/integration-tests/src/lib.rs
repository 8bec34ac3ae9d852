//! Integration tests for TallyAssist.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tallyassist-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `account_lifecycle` - Register, login, logout across store restarts
//! - `password_reset` - Reset token issuance, expiry and consumption
//! - `storage_compat` - Loading data written by the browser build

use std::path::PathBuf;

use chrono::{DateTime, TimeDelta, Utc};
use tallyassist_accounts::{
    CredentialStore, FileStore, ManualClock, PasswordScheme, StoreSettings,
};
use tempfile::TempDir;

/// A file-backed storage scope in a throwaway directory, plus a shared clock.
///
/// Each call to [`TestContext::open`] builds a new store over the same file,
/// which is how these tests simulate a page reload.
pub struct TestContext {
    _dir: TempDir,
    pub path: PathBuf,
    pub clock: ManualClock,
    pub settings: StoreSettings,
}

impl TestContext {
    /// Fresh scope using fast legacy encoding, clock at a fixed instant.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self::with_settings(StoreSettings {
            password_scheme: PasswordScheme::Legacy,
            ..StoreSettings::default()
        })
    }

    /// Fresh scope with explicit settings.
    ///
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created.
    #[must_use]
    pub fn with_settings(settings: StoreSettings) -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("storage.json");
        let start = DateTime::<Utc>::UNIX_EPOCH + TimeDelta::days(19_800);

        Self {
            _dir: dir,
            path,
            clock: ManualClock::new(start),
            settings,
        }
    }

    /// Open a store over the scope file.
    ///
    /// # Panics
    ///
    /// Panics if the stored data cannot be loaded.
    #[must_use]
    pub fn open(&self) -> CredentialStore<FileStore, ManualClock> {
        CredentialStore::open(
            FileStore::new(&self.path),
            self.clock.clone(),
            self.settings.clone(),
        )
        .expect("Failed to open credential store")
    }

    /// Raw JSON of the whole scope file.
    ///
    /// # Panics
    ///
    /// Panics if the file is missing or not JSON.
    #[must_use]
    pub fn raw_scope(&self) -> serde_json::Value {
        let raw = std::fs::read_to_string(&self.path).expect("Failed to read scope file");
        serde_json::from_str(&raw).expect("Scope file is not JSON")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
