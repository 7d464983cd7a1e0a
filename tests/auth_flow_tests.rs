// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, verification, login and logout.

use urbane_client::error::AppError;
use urbane_client::models::{LifecycleStage, RegistrationForm};
use urbane_client::store::{keys, KeyValueStore, ShadowStore};

mod common;
use common::{answers, TestClient, VALID_CODE};

fn form(email: &str) -> RegistrationForm {
    RegistrationForm {
        email: email.to_string(),
        password: "correct horse".to_string(),
        first_name: " Ana ".to_string(),
        last_name: "Diaz".to_string(),
    }
}

#[tokio::test]
async fn test_register_confirm_login() {
    let client = TestClient::new();
    let auth = &client.state.auth;

    let email = auth.register(&form("Ana@Example.com ")).await.unwrap();
    assert_eq!(email, "ana@example.com");

    let pending = auth.pending_names_for("ana@example.com").unwrap().unwrap();
    assert_eq!(pending.first_name, "Ana");

    // Unverified accounts cannot sign in.
    let err = auth.login(&email, "correct horse").await.unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));

    auth.confirm(&email, VALID_CODE).await.unwrap();
    let session = auth.login(&email, "correct horse").await.unwrap();

    assert_eq!(session.display_identity.email, "ana@example.com");
    assert!(!session.display_identity.has_full_name());
    assert_eq!(client.state.cache.load().unwrap(), Some(session.clone()));
    assert_eq!(client.directory.bearer_token(), Some(session.primary_token));

    let stage = client.state.resolver.resolve().await.unwrap();
    assert_eq!(stage, LifecycleStage::AuthenticatedIncomplete);
}

#[tokio::test]
async fn test_register_rejects_bad_input_locally() {
    let client = TestClient::new();

    let err = client
        .state
        .auth
        .register(&form("not-an-email"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "email"));

    let mut short = form("ana@example.com");
    short.password = "short".to_string();
    let err = client.state.auth.register(&short).await.unwrap_err();
    assert!(matches!(err, AppError::Validation { ref field, .. } if field == "password"));

    assert!(client.directory.calls().is_empty());
}

#[tokio::test]
async fn test_confirm_requires_code() {
    let client = TestClient::new();

    let err = client
        .state
        .auth
        .confirm("ana@example.com", "   ")
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert!(client.directory.calls().is_empty());
}

#[tokio::test]
async fn test_wrong_password_keeps_previous_session() {
    let client = TestClient::new();
    client.directory.add_account("ana@example.com", "correct horse", 42);
    client.sign_in(7);

    let err = client
        .state
        .auth
        .login("ana@example.com", "wrong")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Unauthorized(_)));
    assert_eq!(
        client.state.cache.load().unwrap().map(|s| s.subject_id),
        Some(7)
    );
}

#[tokio::test]
async fn test_pending_names_ignored_for_other_email() {
    let client = TestClient::new();
    client.state.auth.register(&form("ana@example.com")).await.unwrap();

    assert!(client
        .state
        .auth
        .pending_names_for("bruno@example.com")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_logout_keeps_shadow_profile() {
    let client = TestClient::new();
    client.directory.add_account("ana@example.com", "correct horse", 42);
    client
        .state
        .auth
        .login("ana@example.com", "correct horse")
        .await
        .unwrap();
    client
        .state
        .onboarding
        .complete(42, &answers())
        .await
        .unwrap();

    client.state.logout().await.unwrap();

    assert!(client.store.get(keys::SESSION).unwrap().is_none());
    assert!(client.directory.bearer_token().is_none());
    assert!(ShadowStore::new(client.store.clone()).load(42).unwrap().is_some());

    let stage = client.state.resolver.resolve().await.unwrap();
    assert_eq!(stage, LifecycleStage::Anonymous);
}
