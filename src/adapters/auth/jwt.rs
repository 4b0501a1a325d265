//! Shared-secret JWT adapter.
//!
//! Implements the `TokenVerifier` port for HS256 tokens signed by the
//! marketplace's login endpoint. Tokens carry the user id in an `id`
//! claim (falling back to the standard `sub`). `exp` is optional, but an
//! expired token is always refused.
//!
//! # Example
//!
//! ```ignore
//! use secrecy::SecretString;
//! use educonnect_chat::adapters::auth::JwtTokenVerifier;
//!
//! let verifier = JwtTokenVerifier::new(SecretString::new("s3cret".into()));
//! let claims = verifier.verify("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::foundation::{AuthError, UserId};
use crate::ports::{TokenClaims, TokenVerifier};

/// Claims issued by the login endpoint.
#[derive(Debug, Deserialize)]
struct MarketplaceClaims {
    /// User id as issued by the account system.
    #[serde(default)]
    id: Option<String>,

    /// Standard subject claim, accepted when `id` is absent.
    #[serde(default)]
    sub: Option<String>,

    /// Expiry (Unix epoch seconds). Checked by `jsonwebtoken` when present.
    #[serde(default)]
    #[allow(dead_code)]
    exp: Option<u64>,
}

/// HS256 token verifier.
pub struct JwtTokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtTokenVerifier {
    pub fn new(secret: SecretString) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();

        Self {
            decoding_key: DecodingKey::from_secret(secret.expose_secret().as_bytes()),
            validation,
        }
    }

    fn decode_claims(&self, token: &str) -> Result<MarketplaceClaims, AuthError> {
        decode::<MarketplaceClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            })
    }
}

#[async_trait]
impl TokenVerifier for JwtTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let claims = self.decode_claims(token)?;

        let raw_id = claims.id.or(claims.sub).ok_or_else(|| {
            tracing::debug!("Token carries neither 'id' nor 'sub'");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::new(raw_id).map_err(|_| AuthError::InvalidToken)?;

        Ok(TokenClaims { user_id })
    }
}

impl std::fmt::Debug for JwtTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenVerifier")
            .field("algorithm", &Algorithm::HS256)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "unit-test-secret-that-is-long-enough";

    fn verifier() -> JwtTokenVerifier {
        JwtTokenVerifier::new(SecretString::new(SECRET.to_string()))
    }

    fn now() -> u64 {
        chrono::Utc::now().timestamp() as u64
    }

    fn sign(claims: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn accepts_token_with_id_claim() {
        let token = sign(json!({"id": "64f1c0ffee", "exp": now() + 3600}), SECRET);

        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.user_id.as_str(), "64f1c0ffee");
    }

    #[tokio::test]
    async fn falls_back_to_sub_claim() {
        let token = sign(json!({"sub": "user-9", "exp": now() + 3600}), SECRET);

        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.user_id.as_str(), "user-9");
    }

    #[tokio::test]
    async fn rejects_wrong_secret() {
        let token = sign(json!({"id": "u", "exp": now() + 3600}), "some-other-secret");

        assert_eq!(verifier().verify(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_expired_token() {
        let token = sign(json!({"id": "u", "exp": now() - 3600}), SECRET);

        assert_eq!(verifier().verify(&token).await, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn accepts_token_without_expiry() {
        let token = sign(json!({"id": "u"}), SECRET);

        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.user_id.as_str(), "u");
    }

    #[tokio::test]
    async fn rejects_token_without_user() {
        let token = sign(json!({"exp": now() + 3600}), SECRET);

        assert_eq!(verifier().verify(&token).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn rejects_garbage() {
        assert_eq!(verifier().verify("not.a.jwt").await, Err(AuthError::InvalidToken));
        assert_eq!(verifier().verify("").await, Err(AuthError::InvalidToken));
    }

    #[test]
    fn debug_output_hides_key_material() {
        let rendered = format!("{:?}", verifier());
        assert!(!rendered.contains(SECRET));
    }

    #[test]
    fn jwt_verifier_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<JwtTokenVerifier>();
    }
}
