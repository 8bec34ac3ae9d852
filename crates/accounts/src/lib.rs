//! TallyAssist Accounts - Local credential store.
//!
//! Registration, login, password reset tokens and a single session slot,
//! persisted to a pluggable key-value scope.
//!
//! # Example
//!
//! ```rust
//! use tallyassist_accounts::{CredentialStore, MemoryStore};
//!
//! let mut store = CredentialStore::with_defaults(MemoryStore::new())?;
//! store.register("alice", "Secret123!", "a@x.com")?;
//! store.clear_current_user()?;
//!
//! let session = store.login("a@x.com", "Secret123!")?;
//! assert_eq!(session.username.as_str(), "alice");
//! # Ok::<(), tallyassist_accounts::AccountError>(())
//! ```
//!
//! # Modules
//!
//! - [`store`] - `CredentialStore` and its error type
//! - [`storage`] - `KeyValueStore` trait with memory and file backends
//! - [`models`] - Persisted records and the session projection
//! - [`password`] - Password schemes and strength rules
//! - [`clock`] - Injectable time source
//! - [`outcome`] - Response envelope for presentation code
//! - [`config`] - Environment configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod clock;
pub mod config;
pub mod models;
pub mod outcome;
pub mod password;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{AccountsConfig, ConfigError};
pub use models::{AccountSummary, ResetToken, ResetTokenEntry, SessionUser, UserRecord};
pub use outcome::Outcome;
pub use password::{PasswordPolicy, PasswordRule, PasswordScheme};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{AccountError, CredentialStore, Registration, StoreSettings};
