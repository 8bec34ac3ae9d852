//! Account operation error types.

use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by [`super::CredentialStore`] operations.
///
/// Display strings are shown to the user verbatim.
#[derive(Debug, Error)]
pub enum AccountError {
    /// Another account already uses this username.
    #[error("Username already exists")]
    DuplicateUsername,

    /// Another account already uses this email.
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown identifier or wrong password. The two cases are
    /// indistinguishable on purpose.
    #[error("Invalid username/email or password")]
    InvalidCredentials,

    /// Reset token unknown, consumed or past its expiry.
    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,

    /// The account a reset token points at no longer exists.
    #[error("User not found")]
    UserNotFound,

    /// Forgot-password request for an address with no account.
    #[error("No account found with that email address")]
    NoAccountForEmail,

    /// The configured token lifetime pushes the expiry past the
    /// representable date range.
    #[error("Reset token lifetime is out of range")]
    TokenLifetime,

    /// Persistence backend failure.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Password hashing failed.
    #[error("Password hashing error")]
    PasswordHash,
}

impl AccountError {
    /// Whether this is an expected business-rule rejection rather than an
    /// infrastructure failure.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(
            self,
            Self::Storage(_) | Self::PasswordHash | Self::TokenLifetime
        )
    }
}
