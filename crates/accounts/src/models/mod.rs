//! Records held by the credential store.
//!
//! These types are also the persisted representation: field names and
//! encodings match what the browser build wrote to local storage.

pub mod reset_token;
pub mod session;
pub mod user;

pub use reset_token::{ResetToken, ResetTokenEntry};
pub use session::{AccountSummary, SessionUser};
pub use user::UserRecord;
