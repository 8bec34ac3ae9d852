//! Stored user records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use tallyassist_core::{Email, Plan, UserId, Username};

use super::SessionUser;

/// A stored account.
///
/// `username` and `email` are each unique across all records. Only
/// `password` ever changes after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Opaque unique ID.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Encoded password, see [`crate::password`].
    pub password: String,
    /// Contact and login address.
    pub email: Email,
    /// When the account was registered.
    pub created_at: DateTime<Utc>,
    /// Subscription plan label.
    pub plan: Plan,
}

impl UserRecord {
    /// Whether `identifier` names this account by username or email.
    #[must_use]
    pub fn is_identified_by(&self, identifier: &str) -> bool {
        self.username == *identifier || self.email == *identifier
    }

    /// Project this record into a session identity (no password).
    #[must_use]
    pub fn session(&self) -> SessionUser {
        SessionUser {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            plan: self.plan.clone(),
        }
    }
}
