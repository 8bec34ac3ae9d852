//! Loading data written by the browser build and switching schemes.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use tallyassist_accounts::storage::keys;
use tallyassist_accounts::{AccountError, PasswordScheme, StoreSettings};
use tallyassist_integration_tests::TestContext;

fn seed_browser_scope(ctx: &TestContext) {
    let users = json!([{
        "id": "1712345678901",
        "username": "alice",
        "password": "U2VjcmV0MTIzIQ==",
        "email": "a@x.com",
        "createdAt": "2024-04-05T18:14:38.901Z",
        "plan": "Premium Plan"
    }]);
    let scope = json!({
        "tallyassist_users": users.to_string(),
        "reset_tokens": "{}",
        "tallyAssist_username": "alice",
    });
    std::fs::write(&ctx.path, scope.to_string()).unwrap();
}

#[test]
fn test_browser_scope_loads_and_logs_in() {
    let ctx = TestContext::new();
    seed_browser_scope(&ctx);

    let mut store = ctx.open();
    let session = store.login("alice", "Secret123!").unwrap();

    assert_eq!(session.id.as_str(), "1712345678901");
    assert_eq!(session.plan.as_str(), "Premium Plan");
}

#[test]
fn test_legacy_password_upgraded_under_argon2() {
    let ctx = TestContext::with_settings(StoreSettings::default());
    seed_browser_scope(&ctx);

    ctx.open().login("a@x.com", "Secret123!").unwrap();

    let store = ctx.open();
    let stored = &store.users().first().unwrap().password;
    assert_eq!(PasswordScheme::detect(stored), PasswordScheme::Argon2);
}

#[test]
fn test_logout_clears_mirrored_keys() {
    let ctx = TestContext::new();
    seed_browser_scope(&ctx);

    let mut store = ctx.open();
    store.login("alice", "Secret123!").unwrap();
    store.clear_current_user().unwrap();

    let scope = ctx.raw_scope();
    assert!(scope.get("tallyAssist_username").is_none());
    assert!(scope.get(keys::CURRENT_USER).is_none());
    assert!(scope.get(keys::USERS).is_some());
}

#[test]
fn test_corrupt_collection_is_reported() {
    let ctx = TestContext::new();
    std::fs::write(&ctx.path, json!({ "tallyassist_users": "[oops" }).to_string()).unwrap();

    let result = tallyassist_accounts::CredentialStore::open(
        tallyassist_accounts::FileStore::new(&ctx.path),
        ctx.clock.clone(),
        ctx.settings.clone(),
    );
    assert!(matches!(result, Err(AccountError::Storage(_))));
}
