//! TallyAssist CLI - Account system front-end.
//!
//! # Usage
//!
//! ```bash
//! # Create an account (signs it in)
//! tally register -u alice -e a@x.com -p 'Secret123!'
//!
//! # Sign in by username or email (omit -p to be prompted)
//! tally login -i a@x.com
//!
//! # Forgot password: prints a demo reset token
//! tally forgot-password -e a@x.com
//! tally reset-password -t <token> -p 'NewPass1!'
//!
//! # JSON output for scripting
//! tally --json whoami
//! ```
//!
//! # Commands
//!
//! - `register` / `login` / `logout` / `whoami` - Account and session
//! - `forgot-password` / `reset-password` - Reset token flow
//! - `prune-tokens` - Drop expired reset tokens

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "TallyAssist account tools")]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign it in
    Register {
        /// Username (must be unique)
        #[arg(short, long)]
        username: String,

        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,

        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Sign in with a username or email
    Login {
        /// Username or email
        #[arg(short, long)]
        identifier: String,

        /// Password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Show the signed-in account
    Whoami,
    /// Sign out
    Logout,
    /// Issue a password reset token for an existing account
    ForgotPassword {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },
    /// Set a new password using a reset token
    ResetPassword {
        /// Reset token
        #[arg(short, long)]
        token: String,

        /// New password (prompted for when omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Remove expired reset tokens from storage
    PruneTokens,
}

fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tallyassist_accounts=info,tallyassist_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            tracing::error!("Command failed: {e}");
            std::process::exit(1);
        }
    }
}

/// Dispatch a command. `Ok(false)` means the operation was rejected.
fn run(cli: Cli) -> Result<bool, commands::CliError> {
    let mut ctx = commands::Context::from_env(cli.json)?;

    match cli.command {
        Commands::Register {
            username,
            email,
            password,
        } => ctx.register(&username, &email, commands::read_password(password, true)?),
        Commands::Login {
            identifier,
            password,
        } => ctx.login(&identifier, commands::read_password(password, false)?),
        Commands::Whoami => ctx.whoami(),
        Commands::Logout => ctx.logout(),
        Commands::ForgotPassword { email } => ctx.forgot_password(&email),
        Commands::ResetPassword { token, password } => {
            ctx.reset_password(&token, commands::read_password(password, true)?)
        }
        Commands::PruneTokens => ctx.prune_tokens(),
    }
}
