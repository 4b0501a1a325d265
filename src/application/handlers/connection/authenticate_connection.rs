//! ConnectionAuthenticator - resolves a bearer token into an `Identity`.
//!
//! Used by the WebSocket handshake and the REST bearer middleware. The
//! checks run in a fixed order and the first failure wins:
//!
//! 1. A token must be present
//! 2. The token must verify (`TokenExpired` / `InvalidToken`)
//! 3. The account must exist
//! 4. The account must not be suspended
//! 5. Students must not have parent control enabled

use std::sync::Arc;

use crate::domain::foundation::{AuthError, Identity, Role};
use crate::ports::{IdentityReader, TokenVerifier};

/// Authenticates connection attempts against the token verifier and the
/// identity store.
#[derive(Clone)]
pub struct ConnectionAuthenticator {
    verifier: Arc<dyn TokenVerifier>,
    identities: Arc<dyn IdentityReader>,
}

impl ConnectionAuthenticator {
    pub fn new(verifier: Arc<dyn TokenVerifier>, identities: Arc<dyn IdentityReader>) -> Self {
        Self {
            verifier,
            identities,
        }
    }

    /// Returns a snapshot of the caller's identity, taken once at handshake.
    pub async fn authenticate(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;

        let claims = self.verifier.verify(token).await?;

        let user = self
            .identities
            .find_user(&claims.user_id)
            .await
            .map_err(|e| {
                tracing::error!(user_id = %claims.user_id, error = %e, "Identity lookup failed");
                AuthError::service_unavailable(e.message)
            })?
            .ok_or(AuthError::UserNotFound)?;

        if user.is_suspended {
            return Err(AuthError::AccountSuspended);
        }

        if user.role == Role::Student {
            let profile = self
                .identities
                .find_student_profile(&user.id)
                .await
                .map_err(|e| {
                    tracing::error!(
                        user_id = %user.id,
                        error = %e,
                        "Student profile lookup failed"
                    );
                    AuthError::service_unavailable(e.message)
                })?;

            if profile.is_some_and(|p| p.parent_control_enabled) {
                return Err(AuthError::ParentControlEnabled);
            }
        }

        Ok(Identity::from(&user))
    }
}

impl std::fmt::Debug for ConnectionAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionAuthenticator").finish_non_exhaustive()
    }
}
