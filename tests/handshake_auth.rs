//! Handshake authentication with real HS256 tokens.
//!
//! Tokens are signed the way the marketplace's login endpoint signs them
//! and checked through `JwtTokenVerifier` + `ConnectionAuthenticator`
//! against the in-memory identity directory.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, EncodingKey, Header};
use secrecy::SecretString;
use serde_json::json;

use educonnect_chat::adapters::memory::InMemoryIdentityDirectory;
use educonnect_chat::adapters::websocket::close_code;
use educonnect_chat::adapters::JwtTokenVerifier;
use educonnect_chat::application::handlers::ConnectionAuthenticator;
use educonnect_chat::domain::foundation::{AuthError, Role, StudentProfile, UserId};

const SECRET: &str = "handshake-test-secret-0123456789abcdef";

fn sign(claims: serde_json::Value, secret: &str) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn token_for(user_id: &str) -> String {
    let exp = Utc::now().timestamp() + 3600;
    sign(json!({ "id": user_id, "exp": exp }), SECRET)
}

async fn setup() -> (ConnectionAuthenticator, Arc<InMemoryIdentityDirectory>) {
    let directory = Arc::new(InMemoryIdentityDirectory::new());
    directory.add_user("student-1", Role::Student).await;
    directory.add_user("teacher-1", Role::Teacher).await;

    let verifier = JwtTokenVerifier::new(SecretString::new(SECRET.to_string()));
    let authenticator = ConnectionAuthenticator::new(Arc::new(verifier), directory.clone());
    (authenticator, directory)
}

#[tokio::test]
async fn valid_token_yields_identity() {
    let (authenticator, _) = setup().await;

    let identity = authenticator
        .authenticate(Some(&token_for("teacher-1")))
        .await
        .unwrap();

    assert_eq!(identity.id.as_str(), "teacher-1");
    assert_eq!(identity.role, Role::Teacher);
    assert_eq!(identity.email, "teacher-1@example.com");
}

#[tokio::test]
async fn expired_token_closes_with_4001() {
    let (authenticator, _) = setup().await;
    let exp = Utc::now().timestamp() - 3600;
    let token = sign(json!({ "id": "teacher-1", "exp": exp }), SECRET);

    let err = authenticator.authenticate(Some(&token)).await.unwrap_err();

    assert_eq!(err, AuthError::TokenExpired);
    assert_eq!(close_code(&err), 4001);
}

#[tokio::test]
async fn token_without_expiry_is_accepted() {
    let (authenticator, _) = setup().await;
    let token = sign(json!({ "id": "student-1" }), SECRET);

    let identity = authenticator.authenticate(Some(&token)).await.unwrap();

    assert_eq!(identity.id.as_str(), "student-1");
    assert_eq!(identity.role, Role::Student);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_invalid() {
    let (authenticator, _) = setup().await;
    let exp = Utc::now().timestamp() + 3600;
    let token = sign(json!({ "id": "teacher-1", "exp": exp }), "someone-elses-secret");

    let err = authenticator.authenticate(Some(&token)).await.unwrap_err();

    assert_eq!(err, AuthError::InvalidToken);
    assert_eq!(close_code(&err), 4002);
}

#[tokio::test]
async fn missing_token_is_refused() {
    let (authenticator, _) = setup().await;

    assert_eq!(
        authenticator.authenticate(None).await.unwrap_err(),
        AuthError::MissingToken
    );
    assert_eq!(
        authenticator.authenticate(Some("   ")).await.unwrap_err(),
        AuthError::MissingToken
    );
}

#[tokio::test]
async fn token_for_deleted_user_is_refused() {
    let (authenticator, _) = setup().await;

    let err = authenticator
        .authenticate(Some(&token_for("deleted-user")))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::UserNotFound);
    assert_eq!(close_code(&err), 4002);
}

#[tokio::test]
async fn suspended_account_closes_with_4003() {
    let (authenticator, directory) = setup().await;
    directory
        .set_suspended(&UserId::new("teacher-1").unwrap(), true)
        .await;

    let err = authenticator
        .authenticate(Some(&token_for("teacher-1")))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::AccountSuspended);
    assert_eq!(close_code(&err), 4003);
}

#[tokio::test]
async fn parent_controlled_student_closes_with_4003() {
    let (authenticator, directory) = setup().await;
    directory
        .set_student_profile(
            &UserId::new("student-1").unwrap(),
            StudentProfile {
                parent_control_enabled: true,
            },
        )
        .await;

    let err = authenticator
        .authenticate(Some(&token_for("student-1")))
        .await
        .unwrap_err();

    assert_eq!(err, AuthError::ParentControlEnabled);
    assert_eq!(close_code(&err), 4003);
}

#[tokio::test]
async fn identity_store_outage_closes_with_1011() {
    let (authenticator, directory) = setup().await;
    directory.set_unavailable(true).await;

    let err = authenticator
        .authenticate(Some(&token_for("teacher-1")))
        .await
        .unwrap_err();

    assert!(err.is_transient());
    assert_eq!(close_code(&err), 1011);
}
