//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware and extractors

pub mod auth;

pub use auth::{auth_error_status, auth_middleware, bearer_token, AuthRejection, RequireAuth};
