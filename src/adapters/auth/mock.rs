//! Mock token verifier for testing.
//!
//! Implements the `TokenVerifier` port without any cryptography, so tests
//! can authenticate connections with plain string tokens.
//!
//! # Example
//!
//! ```ignore
//! use educonnect_chat::adapters::auth::MockTokenVerifier;
//!
//! let verifier = MockTokenVerifier::new().with_token("alice-token", "alice");
//! let claims = verifier.verify("alice-token").await?;
//! assert_eq!(claims.user_id.as_str(), "alice");
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, UserId};
use crate::ports::{TokenClaims, TokenVerifier};

/// Mock token verifier.
///
/// Stores a map of tokens to user ids. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenVerifier {
    tokens: RwLock<HashMap<String, UserId>>,
    /// Optional error to return for all verifications.
    force_error: RwLock<Option<AuthError>>,
}

impl MockTokenVerifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token that resolves to `user_id`.
    ///
    /// # Panics
    ///
    /// Panics if `user_id` is empty.
    pub fn with_token(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        self.add_token(token, user_id);
        self
    }

    /// Forces all verifications to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Registers a token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user_id: impl Into<String>) {
        let user_id = UserId::new(user_id).unwrap();
        self.tokens.write().unwrap().insert(token.into(), user_id);
    }

    /// Revokes a token.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }
}

#[async_trait]
impl TokenVerifier for MockTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .map(|user_id| TokenClaims { user_id })
            .ok_or(AuthError::InvalidToken)
    }
}
