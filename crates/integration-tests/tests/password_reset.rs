//! Reset token issuance, expiry and consumption.

#![allow(clippy::unwrap_used)]

use chrono::TimeDelta;
use tallyassist_accounts::AccountError;
use tallyassist_integration_tests::TestContext;

#[test]
fn test_full_reset_flow() {
    let ctx = TestContext::new();
    ctx.open().register("alice", "Secret123!", "a@x.com").unwrap();

    let token = ctx.open().request_password_reset("a@x.com").unwrap();

    let mut store = ctx.open();
    assert_eq!(
        store.validate_reset_token(token.as_str()).unwrap().as_str(),
        "a@x.com"
    );
    store.reset_password(token.as_str(), "NewPass1!").unwrap();

    let mut store = ctx.open();
    assert!(store.login("alice", "NewPass1!").is_ok());
    assert!(matches!(
        store.login("alice", "Secret123!"),
        Err(AccountError::InvalidCredentials)
    ));
    assert!(matches!(
        store.reset_password(token.as_str(), "Again123!"),
        Err(AccountError::InvalidOrExpiredToken)
    ));
}

#[test]
fn test_reset_does_not_sign_in() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.register("alice", "Secret123!", "a@x.com").unwrap();
    store.clear_current_user().unwrap();

    let token = store.generate_reset_token("a@x.com").unwrap();
    store.reset_password(token.as_str(), "NewPass1!").unwrap();

    assert!(store.current_user().is_none());
    assert!(ctx.open().current_user().is_none());
}

#[test]
fn test_expired_token_after_reload() {
    let ctx = TestContext::new();
    ctx.open().register("alice", "Secret123!", "a@x.com").unwrap();
    let token = ctx.open().generate_reset_token("a@x.com").unwrap();

    ctx.clock.advance(TimeDelta::hours(1) + TimeDelta::seconds(1));

    let mut store = ctx.open();
    assert!(store.validate_reset_token(token.as_str()).is_none());
    assert!(matches!(
        store.reset_password(token.as_str(), "X"),
        Err(AccountError::InvalidOrExpiredToken)
    ));
    assert!(store.login("alice", "Secret123!").is_ok());
}

#[test]
fn test_reset_writes_both_collections() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.register("alice", "Secret123!", "a@x.com").unwrap();
    let keep = store.generate_reset_token("a@x.com").unwrap();
    let used = store.generate_reset_token("a@x.com").unwrap();

    store.reset_password(used.as_str(), "NewPass1!").unwrap();

    let reopened = ctx.open();
    assert_eq!(reopened.reset_token_count(), 1);
    assert!(reopened.validate_reset_token(keep.as_str()).is_some());
    assert!(reopened.validate_reset_token(used.as_str()).is_none());
}

#[test]
fn test_forgot_password_unknown_email() {
    let ctx = TestContext::new();
    let mut store = ctx.open();

    let err = store.request_password_reset("ghost@x.com").unwrap_err();

    assert_eq!(err.to_string(), "No account found with that email address");
    assert_eq!(store.reset_token_count(), 0);
}

#[test]
fn test_prune_persists() {
    let ctx = TestContext::new();
    let mut store = ctx.open();
    store.generate_reset_token("a@x.com").unwrap();
    store.generate_reset_token("b@x.com").unwrap();

    ctx.clock.advance(TimeDelta::hours(2));
    assert_eq!(store.prune_expired_tokens().unwrap(), 2);
    assert_eq!(ctx.open().reset_token_count(), 0);
}
