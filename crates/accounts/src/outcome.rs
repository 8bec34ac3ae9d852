//! Response envelope handed to presentation code.
//!
//! Front-ends never see `Result`s directly; they get `{ success, message }`
//! plus the signed-in user when there is one, and show `message` as-is.

use serde::Serialize;

use crate::store::AccountError;

/// Success messages shown after each operation.
pub mod messages {
    /// After `register`.
    pub const REGISTERED: &str = "User registered successfully";
    /// After `login`.
    pub const LOGGED_IN: &str = "Login successful!";
    /// After `reset_password`.
    pub const PASSWORD_RESET: &str = "Password reset successfully";
    /// After `clear_current_user`.
    pub const LOGGED_OUT: &str = "Logged out";
}

/// Discriminated operation result for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Human-readable confirmation or failure reason.
    pub message: String,
    /// Payload on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<T>,
}

impl<T> Outcome<T> {
    /// Successful outcome carrying `user`.
    #[must_use]
    pub fn ok(message: impl Into<String>, user: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: Some(user),
        }
    }

    /// Failed outcome with the error's display text.
    #[must_use]
    pub fn failure(error: &AccountError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            user: None,
        }
    }

    /// Wrap `result`, using `message` on success.
    #[must_use]
    pub fn from_result(result: Result<T, AccountError>, message: &str) -> Self {
        match result {
            Ok(user) => Self::ok(message, user),
            Err(e) => Self::failure(&e),
        }
    }
}

impl Outcome<()> {
    /// Wrap a payload-free `result`, using `message` on success.
    #[must_use]
    pub fn from_unit(result: Result<(), AccountError>, message: &str) -> Self {
        match result {
            Ok(()) => Self {
                success: true,
                message: message.to_owned(),
                user: None,
            },
            Err(e) => Self::failure(&e),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_success_shape() {
        let outcome = Outcome::from_result(Ok(json!({ "username": "alice" })), messages::LOGGED_IN);

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "success": true,
                "message": "Login successful!",
                "user": { "username": "alice" }
            })
        );
    }

    #[test]
    fn test_failure_shape() {
        let outcome: Outcome<()> =
            Outcome::from_result(Err(AccountError::InvalidCredentials), messages::LOGGED_IN);

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "success": false,
                "message": "Invalid username/email or password"
            })
        );
    }

    #[test]
    fn test_unit_success_has_no_user() {
        let outcome = Outcome::from_unit(Ok(()), messages::PASSWORD_RESET);

        assert!(outcome.success);
        assert!(outcome.user.is_none());
        assert_eq!(outcome.message, "Password reset successfully");
    }
}
