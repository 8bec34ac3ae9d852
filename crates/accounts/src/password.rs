//! Password encoding, verification and strength rules.
//!
//! Two storage schemes exist. [`PasswordScheme::Argon2`] writes salted
//! Argon2id PHC strings and is the default. [`PasswordScheme::Legacy`] writes
//! plain base64 of the password bytes, the format the browser build of
//! TallyAssist stored. It is reversible and exists only so old data keeps
//! working.
//!
//! Verification recognizes either format regardless of the configured scheme.

use core::fmt;
use std::str::FromStr;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Prefix shared by every Argon2 PHC string.
const ARGON2_PREFIX: &str = "$argon2";

/// Minimum password length accepted by [`PasswordPolicy`].
const MIN_PASSWORD_LENGTH: usize = 8;

/// Characters that satisfy the special-character rule.
const SPECIAL_CHARACTERS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// How new passwords are written to storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordScheme {
    /// Salted Argon2id hash.
    #[default]
    Argon2,
    /// Reversible base64 text, compatible with the browser build.
    Legacy,
}

impl PasswordScheme {
    /// Encode `password` for storage.
    ///
    /// # Errors
    ///
    /// Returns the hasher's error if Argon2 hashing fails.
    pub fn encode(self, password: &str) -> Result<String, argon2::password_hash::Error> {
        match self {
            Self::Argon2 => {
                let salt = SaltString::generate(&mut OsRng);
                Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map(|hash| hash.to_string())
            }
            Self::Legacy => Ok(STANDARD.encode(password.as_bytes())),
        }
    }

    /// The scheme that produced `stored`.
    #[must_use]
    pub fn detect(stored: &str) -> Self {
        if stored.starts_with(ARGON2_PREFIX) {
            Self::Argon2
        } else {
            Self::Legacy
        }
    }
}

impl fmt::Display for PasswordScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Argon2 => write!(f, "argon2"),
            Self::Legacy => write!(f, "legacy"),
        }
    }
}

impl FromStr for PasswordScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "argon2" => Ok(Self::Argon2),
            "legacy" => Ok(Self::Legacy),
            _ => Err(format!("invalid password scheme: {s} (expected argon2 or legacy)")),
        }
    }
}

/// Check `password` against a stored encoding of either scheme.
#[must_use]
pub fn verify(password: &str, stored: &str) -> bool {
    match PasswordScheme::detect(stored) {
        PasswordScheme::Argon2 => PasswordHash::new(stored).is_ok_and(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        }),
        PasswordScheme::Legacy => STANDARD.encode(password.as_bytes()) == stored,
    }
}

/// A single password strength requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PasswordRule {
    /// At least eight characters.
    Length,
    /// At least one ASCII uppercase letter.
    Uppercase,
    /// At least one ASCII lowercase letter.
    Lowercase,
    /// At least one ASCII digit.
    Number,
    /// At least one special character.
    Special,
}

impl PasswordRule {
    /// Every rule, in display order.
    pub const ALL: [Self; 5] = [
        Self::Length,
        Self::Uppercase,
        Self::Lowercase,
        Self::Number,
        Self::Special,
    ];

    /// Whether `password` satisfies this rule.
    #[must_use]
    pub fn is_met(self, password: &str) -> bool {
        match self {
            Self::Length => password.chars().count() >= MIN_PASSWORD_LENGTH,
            Self::Uppercase => password.chars().any(|c| c.is_ascii_uppercase()),
            Self::Lowercase => password.chars().any(|c| c.is_ascii_lowercase()),
            Self::Number => password.chars().any(|c| c.is_ascii_digit()),
            Self::Special => password.chars().any(|c| SPECIAL_CHARACTERS.contains(c)),
        }
    }
}

impl fmt::Display for PasswordRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length => write!(f, "at least {MIN_PASSWORD_LENGTH} characters"),
            Self::Uppercase => write!(f, "an uppercase letter"),
            Self::Lowercase => write!(f, "a lowercase letter"),
            Self::Number => write!(f, "a number"),
            Self::Special => write!(f, "a special character"),
        }
    }
}

/// Password strength requirements applied by sign-up and reset forms.
///
/// The credential store does not enforce these; front-ends check them before
/// calling into it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordPolicy;

impl PasswordPolicy {
    /// Rules `password` fails, in display order. Empty means acceptable.
    #[must_use]
    pub fn unmet(self, password: &str) -> Vec<PasswordRule> {
        PasswordRule::ALL
            .into_iter()
            .filter(|rule| !rule.is_met(password))
            .collect()
    }

    /// Whether `password` meets every rule.
    #[must_use]
    pub fn is_satisfied(self, password: &str) -> bool {
        PasswordRule::ALL.iter().all(|rule| rule.is_met(password))
    }
}
