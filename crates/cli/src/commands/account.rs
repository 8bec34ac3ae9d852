//! Registration, login and session commands.

use secrecy::{ExposeSecret, SecretString};

use tallyassist_accounts::Outcome;
use tallyassist_accounts::outcome::messages;

use super::{CliError, Context, describe, settle};

impl Context {
    /// `tally register`
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: SecretString,
    ) -> Result<bool, CliError> {
        if !self.check_identity(username, email)? || !self.check_password(&password)? {
            return Ok(false);
        }

        let result = settle(
            self.store
                .register(username, password.expose_secret(), email)
                .map(|registration| registration.session),
        )?;
        let text = describe(&result, |session| {
            format!("Registration successful! Welcome to TallyAssist, {}.", session.username)
        });

        self.emit(&Outcome::from_result(result, messages::REGISTERED), &text)
    }

    /// `tally login`
    pub fn login(&mut self, identifier: &str, password: SecretString) -> Result<bool, CliError> {
        let result = settle(self.store.login(identifier, password.expose_secret()))?;
        let text = describe(&result, |session| {
            format!("Login successful! Signed in as {}.", session.username)
        });

        self.emit(&Outcome::from_result(result, messages::LOGGED_IN), &text)
    }

    /// `tally whoami`
    pub fn whoami(&self) -> Result<bool, CliError> {
        let summary = self.store.account_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if summary.signed_in {
            println!("{} <{}> - {}", summary.username, summary.email, summary.plan);
        } else {
            println!("Not logged in");
        }
        Ok(summary.signed_in)
    }

    /// `tally logout`
    pub fn logout(&mut self) -> Result<bool, CliError> {
        self.store.clear_current_user()?;

        let outcome = Outcome::from_unit(Ok(()), messages::LOGGED_OUT);
        self.emit(&outcome, &outcome.message)
    }
}
