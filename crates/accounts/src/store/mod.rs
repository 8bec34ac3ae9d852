//! Credential store.
//!
//! Owns the user list, the outstanding reset tokens and the single session
//! slot. Everything is loaded from the backend once at [`CredentialStore::open`]
//! and written back eagerly after each successful mutation; reads are served
//! from memory.

mod error;

pub use error::AccountError;

use std::collections::BTreeMap;

use chrono::{DateTime, TimeDelta, Utc};

use tallyassist_core::{Email, Plan, UserId, Username};

use crate::clock::{Clock, SystemClock};
use crate::models::{AccountSummary, ResetToken, ResetTokenEntry, SessionUser, UserRecord};
use crate::password::{self, PasswordScheme};
use crate::storage::{KeyValueStore, WriteOp, keys, read_json, set_json};

type TokenMap = BTreeMap<ResetToken, ResetTokenEntry>;

/// Default lifetime of a reset token.
pub const DEFAULT_RESET_TOKEN_TTL: TimeDelta = TimeDelta::hours(1);

/// Tunables for a [`CredentialStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    /// How long a reset token stays usable after issuance.
    pub reset_token_ttl: TimeDelta,
    /// Plan label given to new accounts.
    pub default_plan: Plan,
    /// Encoding used for newly written passwords.
    pub password_scheme: PasswordScheme,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            reset_token_ttl: DEFAULT_RESET_TOKEN_TTL,
            default_plan: Plan::default(),
            password_scheme: PasswordScheme::default(),
        }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The stored record, including the encoded password.
    pub user: UserRecord,
    /// The session that registration opened.
    pub session: SessionUser,
}

/// Local account system backed by a key-value scope.
pub struct CredentialStore<S, C = SystemClock> {
    backend: S,
    clock: C,
    settings: StoreSettings,
    users: Vec<UserRecord>,
    reset_tokens: TokenMap,
    current_user: Option<SessionUser>,
}

impl<S: KeyValueStore> CredentialStore<S> {
    /// Open a store on wall-clock time with default settings.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if a persisted collection cannot be read.
    pub fn with_defaults(backend: S) -> Result<Self, AccountError> {
        Self::open(backend, SystemClock, StoreSettings::default())
    }
}

impl<S: KeyValueStore, C: Clock> CredentialStore<S, C> {
    /// Load users, reset tokens and the session slot from `backend`.
    ///
    /// Absent keys start empty. Present but undecodable keys are an error.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the backend fails or holds corrupt data.
    pub fn open(backend: S, clock: C, settings: StoreSettings) -> Result<Self, AccountError> {
        let users: Vec<UserRecord> = read_json(&backend, keys::USERS)?.unwrap_or_default();
        let reset_tokens: TokenMap = read_json(&backend, keys::RESET_TOKENS)?.unwrap_or_default();
        let current_user: Option<SessionUser> = read_json(&backend, keys::CURRENT_USER)?;

        tracing::debug!(
            users = users.len(),
            reset_tokens = reset_tokens.len(),
            signed_in = current_user.is_some(),
            "Credential store loaded"
        );

        Ok(Self {
            backend,
            clock,
            settings,
            users,
            reset_tokens,
            current_user,
        })
    }

    // =========================================================================
    // Registration & Login
    // =========================================================================

    /// Create an account and sign it in.
    ///
    /// `username` and `email` are stored as given. Shape checks belong to
    /// the front-end.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::DuplicateUsername` if the username is taken.
    /// Returns `AccountError::DuplicateEmail` if the email is taken.
    pub fn register(
        &mut self,
        username: &str,
        password: &str,
        email: &str,
    ) -> Result<Registration, AccountError> {
        if self.users.iter().any(|u| u.username == *username) {
            return Err(AccountError::DuplicateUsername);
        }

        if self.users.iter().any(|u| u.email == *email) {
            return Err(AccountError::DuplicateEmail);
        }

        let record = UserRecord {
            id: UserId::generate(),
            username: Username::from_raw(username),
            password: self.encode_password(password)?,
            email: Email::from_raw(email),
            created_at: self.clock.now(),
            plan: self.settings.default_plan.clone(),
        };
        let session = record.session();

        let mut users = self.users.clone();
        users.push(record.clone());

        self.backend.apply(&[
            set_json(keys::USERS, &users)?,
            set_json(keys::CURRENT_USER, &session)?,
        ])?;

        self.users = users;
        self.current_user = Some(session.clone());

        tracing::info!(user_id = %record.id, username = %record.username, "User registered");

        Ok(Registration {
            user: record,
            session,
        })
    }

    /// Sign in by username or email.
    ///
    /// A legacy record is re-encoded with Argon2 on success when Argon2 is
    /// the configured scheme. Argon2 records are never downgraded.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidCredentials` if no account matches
    /// `identifier` or the password is wrong.
    pub fn login(&mut self, identifier: &str, password: &str) -> Result<SessionUser, AccountError> {
        let Some(user) = self.users.iter().find(|u| u.is_identified_by(identifier)) else {
            tracing::warn!("Login rejected: unknown identifier");
            return Err(AccountError::InvalidCredentials);
        };

        if !password::verify(password, &user.password) {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let session = user.session();
        let migrated = self.migrate_password(user, password);

        let mut batch = vec![set_json(keys::CURRENT_USER, &session)?];
        if let Some(users) = &migrated {
            batch.push(set_json(keys::USERS, users)?);
        }
        self.backend.apply(&batch)?;

        if let Some(users) = migrated {
            self.users = users;
        }
        self.current_user = Some(session.clone());

        tracing::info!(user_id = %session.id, "User logged in");
        Ok(session)
    }

    /// The signed-in identity, if any.
    #[must_use]
    pub const fn current_user(&self) -> Option<&SessionUser> {
        self.current_user.as_ref()
    }

    /// Display values for the account menu.
    #[must_use]
    pub fn account_summary(&self) -> AccountSummary {
        AccountSummary::from_session(self.current_user.as_ref())
    }

    /// Sign out. The session slot and any legacy profile copies are removed.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the backend cannot be written. The
    /// in-memory session is cleared regardless.
    pub fn clear_current_user(&mut self) -> Result<(), AccountError> {
        if let Some(session) = self.current_user.take() {
            tracing::info!(user_id = %session.id, "User logged out");
        }

        let batch: Vec<WriteOp<'_>> = std::iter::once(keys::CURRENT_USER)
            .chain(keys::LEGACY_PROFILE)
            .map(|key| WriteOp::Remove { key })
            .collect();
        self.backend.apply(&batch)?;
        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Every stored account, in registration order.
    #[must_use]
    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    /// The account registered under `email`.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> Option<&UserRecord> {
        self.users.iter().find(|u| u.email == *email)
    }

    // =========================================================================
    // Password Reset
    // =========================================================================

    /// Issue a reset token for `email`.
    ///
    /// Does not check that an account exists; see
    /// [`Self::request_password_reset`] for the checked variant. Expired
    /// tokens are pruned in the same write.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::TokenLifetime` if the configured lifetime
    /// overflows the expiry date.
    /// Returns `AccountError::Storage` if the tokens cannot be persisted.
    pub fn generate_reset_token(&mut self, email: &str) -> Result<ResetToken, AccountError> {
        let now = self.clock.now();
        let expires = now
            .checked_add_signed(self.settings.reset_token_ttl)
            .ok_or(AccountError::TokenLifetime)?;

        let mut tokens = self.live_tokens(now);
        let pruned = self.reset_tokens.len() - tokens.len();

        let mut token = ResetToken::generate();
        while tokens.contains_key(&token) {
            token = ResetToken::generate();
        }

        tokens.insert(
            token.clone(),
            ResetTokenEntry {
                email: Email::from_raw(email),
                expires,
            },
        );

        self.backend.apply(&[set_json(keys::RESET_TOKENS, &tokens)?])?;
        self.reset_tokens = tokens;

        if pruned > 0 {
            tracing::debug!(pruned, "Expired reset tokens pruned");
        }
        tracing::info!("Password reset token issued");

        Ok(token)
    }

    /// Issue a reset token, but only for an address that has an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NoAccountForEmail` if no account uses `email`.
    /// Returns `AccountError::Storage` if the tokens cannot be persisted.
    pub fn request_password_reset(&mut self, email: &str) -> Result<ResetToken, AccountError> {
        if self.user_by_email(email).is_none() {
            tracing::warn!("Password reset requested for unknown email");
            return Err(AccountError::NoAccountForEmail);
        }
        self.generate_reset_token(email)
    }

    /// The email a token unlocks, if the token exists and has not expired.
    ///
    /// Read-only: an expired token is reported as invalid but left in place.
    #[must_use]
    pub fn validate_reset_token(&self, token: &str) -> Option<&Email> {
        let entry = self.reset_tokens.get(token)?;
        entry.is_valid_at(self.clock.now()).then_some(&entry.email)
    }

    /// Overwrite an account's password using a reset token.
    ///
    /// The password update and the token's removal are written in one batch.
    /// Does not sign anyone in.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::InvalidOrExpiredToken` if the token is unknown
    /// or expired.
    /// Returns `AccountError::UserNotFound` if the token's account is gone.
    pub fn reset_password(&mut self, token: &str, new_password: &str) -> Result<(), AccountError> {
        let now = self.clock.now();

        let Some(email) = self.validate_reset_token(token).cloned() else {
            tracing::warn!("Password reset rejected: invalid or expired token");
            return Err(AccountError::InvalidOrExpiredToken);
        };

        let Some(index) = self.users.iter().position(|u| u.email == email) else {
            tracing::warn!("Password reset rejected: account no longer exists");
            return Err(AccountError::UserNotFound);
        };

        let encoded = self.encode_password(new_password)?;
        let mut users = self.users.clone();
        let Some(user) = users.get_mut(index) else {
            return Err(AccountError::UserNotFound);
        };
        user.password = encoded;
        let user_id = user.id.clone();

        let mut tokens = self.live_tokens(now);
        tokens.remove(token);

        self.backend.apply(&[
            set_json(keys::USERS, &users)?,
            set_json(keys::RESET_TOKENS, &tokens)?,
        ])?;

        self.users = users;
        self.reset_tokens = tokens;

        tracing::info!(user_id = %user_id, "Password reset");
        Ok(())
    }

    /// Drop every reset token at or past its expiry.
    ///
    /// Returns how many were removed. Nothing is written when none expired.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Storage` if the tokens cannot be persisted.
    pub fn prune_expired_tokens(&mut self) -> Result<usize, AccountError> {
        let tokens = self.live_tokens(self.clock.now());
        let pruned = self.reset_tokens.len() - tokens.len();

        if pruned > 0 {
            self.backend.apply(&[set_json(keys::RESET_TOKENS, &tokens)?])?;
            self.reset_tokens = tokens;
            tracing::debug!(pruned, "Expired reset tokens pruned");
        }

        Ok(pruned)
    }

    /// Number of reset tokens held, expired ones included.
    #[must_use]
    pub fn reset_token_count(&self) -> usize {
        self.reset_tokens.len()
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn encode_password(&self, password: &str) -> Result<String, AccountError> {
        self.settings
            .password_scheme
            .encode(password)
            .map_err(|_| AccountError::PasswordHash)
    }

    /// Tokens still valid at `now`.
    fn live_tokens(&self, now: DateTime<Utc>) -> TokenMap {
        self.reset_tokens
            .iter()
            .filter(|(_, entry)| entry.is_valid_at(now))
            .map(|(token, entry)| (token.clone(), entry.clone()))
            .collect()
    }

    /// Users with `user`'s legacy password upgraded to Argon2, or `None`
    /// when there is nothing to upgrade.
    fn migrate_password(&self, user: &UserRecord, password: &str) -> Option<Vec<UserRecord>> {
        let scheme = self.settings.password_scheme;
        if scheme != PasswordScheme::Argon2
            || PasswordScheme::detect(&user.password) != PasswordScheme::Legacy
        {
            return None;
        }

        let encoded = match scheme.encode(password) {
            Ok(encoded) => encoded,
            Err(e) => {
                tracing::warn!(user_id = %user.id, error = %e, "Password re-encoding skipped");
                return None;
            }
        };

        let mut users = self.users.clone();
        let target = users.iter_mut().find(|u| u.id == user.id)?;
        target.password = encoded;

        tracing::info!(user_id = %user.id, scheme = %scheme, "Stored password re-encoded");
        Some(users)
    }
}
