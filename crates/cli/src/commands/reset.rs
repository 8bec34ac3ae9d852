//! Password reset commands.

use secrecy::{ExposeSecret, SecretString};

use tallyassist_accounts::Outcome;
use tallyassist_accounts::outcome::messages;

use super::{CliError, Context, describe, settle};

impl Context {
    /// `tally forgot-password`
    ///
    /// There is no mail delivery; the token is printed instead.
    pub fn forgot_password(&mut self, email: &str) -> Result<bool, CliError> {
        let result = settle(
            self.store
                .request_password_reset(email)
                .map(|token| token.to_string()),
        )?;
        let text = describe(&result, |token| {
            format!(
                "Password reset link has been sent to {email}. For demo purposes, your reset token is: {token}"
            )
        });

        match result {
            Ok(token) if self.json => {
                let body = serde_json::json!({ "success": true, "message": text, "token": token });
                println!("{}", serde_json::to_string_pretty(&body)?);
                Ok(true)
            }
            Ok(_) => {
                println!("{text}");
                Ok(true)
            }
            Err(e) => self.emit(&Outcome::<()>::failure(&e), &text),
        }
    }

    /// `tally reset-password`
    pub fn reset_password(&mut self, token: &str, password: SecretString) -> Result<bool, CliError> {
        if !self.check_password(&password)? {
            return Ok(false);
        }

        let result = settle(self.store.reset_password(token, password.expose_secret()))?;

        let outcome = Outcome::from_unit(result, messages::PASSWORD_RESET);
        self.emit(&outcome, &outcome.message)
    }

    /// `tally prune-tokens`
    pub fn prune_tokens(&mut self) -> Result<bool, CliError> {
        let pruned = self.store.prune_expired_tokens()?;

        if self.json {
            println!("{}", serde_json::json!({ "success": true, "pruned": pruned }));
        } else {
            println!("Removed {pruned} expired reset token(s)");
        }
        Ok(true)
    }
}
