//! The signed-in identity.

use serde::{Deserialize, Serialize};

use tallyassist_core::{Email, Plan, UserId, Username};

/// Identity held in the session slot.
///
/// A password-free projection of a [`super::UserRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// ID of the underlying record.
    pub id: UserId,
    /// Login name.
    pub username: Username,
    /// Account email.
    pub email: Email,
    /// Subscription plan label.
    pub plan: Plan,
}

/// What the account menu and welcome banner display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    /// Display name.
    pub username: String,
    /// Display email.
    pub email: String,
    /// Display plan.
    pub plan: String,
    /// Whether these values come from a live session.
    pub signed_in: bool,
}

impl AccountSummary {
    const FALLBACK_USERNAME: &'static str = "User";
    const FALLBACK_EMAIL: &'static str = "user@example.com";

    /// Summary for the given session, or placeholders when signed out.
    #[must_use]
    pub fn from_session(session: Option<&SessionUser>) -> Self {
        session.map_or_else(
            || Self {
                username: Self::FALLBACK_USERNAME.to_owned(),
                email: Self::FALLBACK_EMAIL.to_owned(),
                plan: Plan::PREMIUM.to_owned(),
                signed_in: false,
            },
            |user| Self {
                username: user.username.to_string(),
                email: user.email.to_string(),
                plan: user.plan.to_string(),
                signed_in: true,
            },
        )
    }
}
