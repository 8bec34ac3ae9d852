//! Core types for TallyAssist.
//!
//! This module provides type-safe wrappers for account identity concepts.

pub mod email;
pub mod id;
pub mod plan;
pub mod username;

pub use email::{Email, EmailError};
pub use id::UserId;
pub use plan::Plan;
pub use username::{Username, UsernameError};
