//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that validates Bearer tokens and injects the caller's `Identity`
//! - `RequireAuth` - Extractor that requires authentication
//! - `bearer_token` - Shared `Authorization` header parsing (also used by the socket handshake)
//!
//! # Architecture
//!
//! The middleware runs the same `ConnectionAuthenticator` as the WebSocket
//! handshake, so suspended and parent-locked accounts are refused on both
//! surfaces.
//!
//! ```text
//! Request → auth_middleware → injects Identity into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get, middleware};
//!
//! let app = Router::new()
//!     .route("/api/protected", get(protected_handler))
//!     .layer(middleware::from_fn_with_state(authenticator.clone(), auth_middleware));
//!
//! async fn protected_handler(RequireAuth(identity): RequireAuth) -> String {
//!     format!("Hello, {}!", identity.name)
//! }
//! ```

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::application::handlers::ConnectionAuthenticator;
use crate::domain::foundation::{AuthError, Identity};

/// Extracts the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware that validates Bearer tokens.
///
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Authenticates it with the `ConnectionAuthenticator`
/// 3. On success, injects `Identity` into request extensions
/// 4. On missing token, continues without injecting (handlers use `RequireAuth`)
/// 5. On failure, responds with the mapped status
pub async fn auth_middleware(
    State(authenticator): State<ConnectionAuthenticator>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return next.run(request).await;
    };

    match authenticator.authenticate(Some(&token)).await {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(e) => {
            let status = auth_error_status(&e);
            if e.is_transient() {
                tracing::error!(error = %e, "Auth service unavailable");
            } else {
                tracing::warn!(error = %e, "Request authentication failed");
            }

            (
                status,
                Json(serde_json::json!({
                    "error": e.to_string(),
                    "code": "AUTH_ERROR"
                })),
            )
                .into_response()
        }
    }
}

/// HTTP status for an authentication failure.
pub fn auth_error_status(error: &AuthError) -> StatusCode {
    match error {
        AuthError::MissingToken
        | AuthError::InvalidToken
        | AuthError::TokenExpired
        | AuthError::UserNotFound => StatusCode::UNAUTHORIZED,
        AuthError::AccountSuspended | AuthError::ParentControlEnabled => StatusCode::FORBIDDEN,
        AuthError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Extractor that requires authentication.
///
/// If no identity is in the request extensions (i.e., the auth middleware
/// didn't successfully validate a token), returns 401 Unauthorized.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(RequireAuth)
            .ok_or(AuthRejection::Unauthenticated)
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => (StatusCode::UNAUTHORIZED, "No token provided"),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{Role, UserId};
    use axum::http::HeaderValue;

    fn test_identity() -> Identity {
        Identity::new(
            UserId::new("user-123").unwrap(),
            Role::Teacher,
            "Test User",
            "test@example.com",
        )
    }

    // ════════════════════════════════════════════════════════════════════════════
    // RequireAuth Extractor Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn require_auth_extracts_identity_from_extensions() {
        let mut request: axum::http::Request<()> =
            axum::http::Request::builder().uri("/test").body(()).unwrap();
        request.extensions_mut().insert(test_identity());
        let (mut parts, _body) = request.into_parts();

        let result = RequireAuth::from_request_parts(&mut parts, &()).await;

        let RequireAuth(identity) = result.unwrap();
        assert_eq!(identity.email, "test@example.com");
    }

    #[tokio::test]
    async fn require_auth_fails_without_identity() {
        let request: axum::http::Request<()> =
            axum::http::Request::builder().uri("/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result = RequireAuth::from_request_parts(&mut parts, &()).await;

        assert!(matches!(result, Err(AuthRejection::Unauthenticated)));
    }

    #[test]
    fn auth_rejection_returns_401() {
        let response = AuthRejection::Unauthenticated.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Token Extraction and Status Mapping
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn bearer_token_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer my-secret-token"));
        assert_eq!(bearer_token(&headers), Some("my-secret-token"));

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn locked_accounts_map_to_forbidden() {
        assert_eq!(auth_error_status(&AuthError::AccountSuspended), StatusCode::FORBIDDEN);
        assert_eq!(
            auth_error_status(&AuthError::ParentControlEnabled),
            StatusCode::FORBIDDEN
        );
        assert_eq!(auth_error_status(&AuthError::TokenExpired), StatusCode::UNAUTHORIZED);
        assert_eq!(
            auth_error_status(&AuthError::service_unavailable("db down")),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn require_auth_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RequireAuth>();
    }
}
