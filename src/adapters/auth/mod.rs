//! Authentication adapters.
//!
//! Implementations of the `TokenVerifier` port:
//!
//! - `jwt` - HS256 shared-secret tokens issued by the marketplace login
//! - `mock` - Test implementation that doesn't need signed tokens

mod jwt;
mod mock;

pub use jwt::JwtTokenVerifier;
pub use mock::MockTokenVerifier;
