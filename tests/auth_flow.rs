use std::sync::Arc;

use credential_service::auth::{AuthService, BcryptHasher, CredentialHasher, JwtIssuer};
use credential_service::db::{InMemoryUserStore, UserStore};
use credential_service::response::ResponseNormalizer;
use serde_json::json;

const SECRET: &str = "integration_secret";

fn service(store: &InMemoryUserStore) -> AuthService {
    AuthService::new(
        Arc::new(store.clone()),
        Arc::new(BcryptHasher::new(4)),
        Arc::new(JwtIssuer::new(Some(SECRET.to_string()), 24)),
        ResponseNormalizer::new(),
    )
}

#[tokio::test]
async fn test_register_then_login_scenario() {
    let store = InMemoryUserStore::new();
    let auth = service(&store);
    let registration = json!({ "email": "a@b.com", "fullName": "Ann Lee", "password": "secret1" });

    let first = auth.register(&registration).await;
    assert_eq!(first.status, 201);
    assert_eq!(first.text(), Some("Success"));

    let second = auth.register(&registration).await;
    assert_eq!(second.status, 409);
    assert_eq!(second.text(), Some("Email already exists"));
    assert_eq!(store.len().await, 1);

    let ok = auth.login(&json!({ "email": "a@b.com", "password": "secret1" })).await;
    assert_eq!(ok.status, 200);
    let payload = ok.payload().expect("login returns a payload");
    assert!(!payload["token"].as_str().unwrap().is_empty());
    assert_eq!(payload["email"], "a@b.com");
    assert_eq!(payload["name"], "Ann Lee");

    let wrong = auth.login(&json!({ "email": "a@b.com", "password": "wrong1" })).await;
    assert_eq!(wrong.status, 401);
    assert_eq!(wrong.text(), Some("Invalid password"));
    assert!(wrong.payload().is_none());
}

#[tokio::test]
async fn test_short_wrong_password_fails_validation() {
    let store = InMemoryUserStore::new();
    let auth = service(&store);

    // "wrong" is under the 6-character minimum, so the schema rejects it first.
    let envelope = auth.login(&json!({ "email": "a@b.com", "password": "wrong" })).await;
    assert_eq!(envelope.status, 400);
    assert!(envelope.text().unwrap().contains("Password"));
}

#[tokio::test]
async fn test_stored_secret_is_hashed() {
    let store = InMemoryUserStore::new();
    let auth = service(&store);

    let envelope = auth
        .register(&json!({ "email": "hash@b.com", "fullName": "Hash Check", "password": "secret1" }))
        .await;
    assert_eq!(envelope.status, 201);

    let user = store.find_by_email("hash@b.com").await.unwrap().unwrap();
    assert_ne!(user.password_hash, "secret1");
    assert!(BcryptHasher::new(4).verify("secret1", &user.password_hash).await);
    assert_eq!(user.full_name, "Hash Check");
}

#[tokio::test]
async fn test_issued_token_carries_identity() {
    let store = InMemoryUserStore::new();
    let auth = service(&store);
    auth.register(&json!({ "email": "jwt@b.com", "fullName": "Jay Dub", "password": "secret1" }))
        .await;

    let envelope = auth.login(&json!({ "email": "jwt@b.com", "password": "secret1" })).await;
    let token = envelope.payload().unwrap()["token"].as_str().unwrap().to_string();

    let user = store.find_by_email("jwt@b.com").await.unwrap().unwrap();
    let claims = JwtIssuer::new(Some(SECRET.to_string()), 24).decode(&token).unwrap();
    assert_eq!(claims.sub, user.id.to_string());
    assert_eq!(claims.email, "jwt@b.com");
}

#[tokio::test]
async fn test_login_unknown_email() {
    let store = InMemoryUserStore::new();
    let envelope = service(&store)
        .login(&json!({ "email": "ghost@b.com", "password": "secret1" }))
        .await;

    assert_eq!(envelope.status, 404);
    assert_eq!(envelope.text(), Some("Email not found"));
}

#[tokio::test]
async fn test_validation_names_each_field() {
    let store = InMemoryUserStore::new();
    let auth = service(&store);

    let cases = [
        (json!({ "email": "", "fullName": "Ann Lee", "password": "secret1" }), "Email"),
        (json!({ "email": "a@b.com", "fullName": "Ann 2", "password": "secret1" }), "Full name"),
        (json!({ "email": "a@b.com", "fullName": "Ann Lee", "password": "123" }), "Password"),
    ];
    for (payload, field) in cases {
        let envelope = auth.register(&payload).await;
        assert_eq!(envelope.status, 400);
        assert!(envelope.text().unwrap().contains(field), "{payload} should mention {field}");
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_missing_secret_reports_token_failure() {
    let store = InMemoryUserStore::new();
    let auth = AuthService::new(
        Arc::new(store.clone()),
        Arc::new(BcryptHasher::new(4)),
        Arc::new(JwtIssuer::new(None, 24)),
        ResponseNormalizer::new(),
    );
    auth.register(&json!({ "email": "a@b.com", "fullName": "Ann Lee", "password": "secret1" }))
        .await;

    let envelope = auth.login(&json!({ "email": "a@b.com", "password": "secret1" })).await;
    assert_eq!(envelope.status, 500);
    assert_eq!(envelope.text(), Some("Token generation failed"));
}

#[tokio::test]
async fn test_concurrent_registrations_for_one_email() {
    let store = InMemoryUserStore::new();
    let auth = Arc::new(service(&store));
    let payload = json!({ "email": "race@b.com", "fullName": "Race Case", "password": "secret1" });

    let mut handles = Vec::new();
    for _ in 0..6 {
        let auth = auth.clone();
        let payload = payload.clone();
        handles.push(tokio::spawn(async move { auth.register(&payload).await.status }));
    }

    let mut statuses = Vec::new();
    for handle in handles {
        statuses.push(handle.await.unwrap());
    }

    assert_eq!(statuses.iter().filter(|s| **s == 201).count(), 1);
    assert!(statuses.iter().all(|s| *s == 201 || *s == 409));
    assert_eq!(store.len().await, 1);
}
