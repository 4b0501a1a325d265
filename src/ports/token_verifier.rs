//! Token verification port for connection handshakes.
//!
//! Decodes and verifies a bearer credential, yielding the id of the user
//! it was issued to. Resolving that id to a live account is a separate
//! step (see [`IdentityReader`](super::IdentityReader)), so a verifier never
//! touches user storage.
//!
//! # Contract
//!
//! Implementations must:
//! - Verify the token signature against the configured secret
//! - Reject expired tokens with `AuthError::TokenExpired`
//! - Reject malformed, unsigned or wrongly signed tokens with `AuthError::InvalidToken`
//! - Never panic on attacker-controlled input

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, UserId};

/// Claims this core reads from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// The user the token was issued to.
    pub user_id: UserId,
}

/// Verifies credential tokens presented at connection time.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify a raw token (no `Bearer ` prefix) and return its claims.
    async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;
}
