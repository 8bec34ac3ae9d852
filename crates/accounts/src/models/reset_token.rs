//! Password reset tokens.

use core::fmt;
use std::borrow::Borrow;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use tallyassist_core::Email;

/// Length of a generated token.
const TOKEN_LENGTH: usize = 26;

const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Opaque single-use reset capability.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResetToken(String);

impl ResetToken {
    /// Draw a fresh random token from the thread-local CSPRNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let token = (0..TOKEN_LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..CHARSET.len());
                CHARSET.get(idx).map_or('0', |&b| char::from(b))
            })
            .collect();
        Self(token)
    }

    /// Wrap a token string received from a user.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResetToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ResetToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// What a token unlocks and until when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetTokenEntry {
    /// Account whose password the token may overwrite.
    pub email: Email,
    /// Expiry instant, stored as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expires: DateTime<Utc>,
}

impl ResetTokenEntry {
    /// Usable strictly before `expires`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires
    }
}
