//! TallyAssist Core - Shared account types.
//!
//! This crate provides the identity types used across TallyAssist components:
//! - `accounts` - Credential store, reset tokens and the session slot
//! - `cli` - Command-line front-end for the account system
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no clocks.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for user IDs, usernames, emails, and plans

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
