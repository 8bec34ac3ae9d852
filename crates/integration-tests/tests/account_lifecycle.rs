//! Register, login and logout against a file-backed scope.
//!
//! Every reopen of the store stands in for a page reload.

#![allow(clippy::unwrap_used)]

use tallyassist_accounts::storage::keys;
use tallyassist_accounts::{AccountError, Outcome, outcome::messages};
use tallyassist_integration_tests::TestContext;

#[test]
fn test_registration_survives_reload() {
    let ctx = TestContext::new();

    let registration = ctx.open().register("alice", "Secret123!", "a@x.com").unwrap();

    let store = ctx.open();
    assert_eq!(store.users().len(), 1);
    assert_eq!(store.current_user(), Some(&registration.session));
    assert_eq!(store.account_summary().email, "a@x.com");
}

#[test]
fn test_login_after_logout_and_reload() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.register("alice", "Secret123!", "a@x.com").unwrap();
    store.clear_current_user().unwrap();

    let mut store = ctx.open();
    assert!(store.current_user().is_none());

    let session = store.login("alice", "Secret123!").unwrap();
    assert_eq!(session.email.as_str(), "a@x.com");
    assert_eq!(ctx.open().current_user(), Some(&session));
}

#[test]
fn test_duplicates_rejected_across_reloads() {
    let ctx = TestContext::new();
    ctx.open().register("alice", "Secret123!", "a@x.com").unwrap();

    let mut store = ctx.open();
    assert!(matches!(
        store.register("alice", "Secret123!", "other@x.com"),
        Err(AccountError::DuplicateUsername)
    ));
    assert!(matches!(
        store.register("alicia", "Secret123!", "a@x.com"),
        Err(AccountError::DuplicateEmail)
    ));
    assert_eq!(ctx.open().users().len(), 1);
}

#[test]
fn test_login_outcome_envelope() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.register("alice", "Secret123!", "a@x.com").unwrap();

    let ok = Outcome::from_result(store.login("a@x.com", "Secret123!"), messages::LOGGED_IN);
    let bad_password = Outcome::from_result(store.login("alice", "wrong"), messages::LOGGED_IN);
    let unknown = Outcome::from_result(store.login("nobody", "x"), messages::LOGGED_IN);

    let ok = serde_json::to_value(&ok).unwrap();
    assert_eq!(ok["success"], true);
    assert_eq!(ok["user"]["username"], "alice");
    assert!(ok["user"].get("password").is_none());

    assert!(!bad_password.success);
    assert_eq!(bad_password.message, unknown.message);
    assert_eq!(bad_password.message, "Invalid username/email or password");
}

#[test]
fn test_session_is_single_slot() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.register("alice", "Secret123!", "a@x.com").unwrap();
    store.register("bob", "Hunter22!", "b@x.com").unwrap();

    assert_eq!(store.current_user().unwrap().username.as_str(), "bob");

    store.login("alice", "Secret123!").unwrap();
    let scope = ctx.raw_scope();
    let slot: serde_json::Value =
        serde_json::from_str(scope[keys::CURRENT_USER].as_str().unwrap()).unwrap();
    assert_eq!(slot["username"], "alice");
}

#[test]
fn test_no_mirrored_profile_keys_written() {
    let ctx = TestContext::new();
    ctx.open().register("alice", "Secret123!", "a@x.com").unwrap();

    let scope = ctx.raw_scope();
    for key in keys::LEGACY_PROFILE {
        assert!(scope.get(key).is_none(), "{key}");
    }
}
