//! Authentication types for the domain layer.
//!
//! A connection is authenticated once, at handshake time. The resulting
//! [`Identity`] is a snapshot of the user record and is never re-fetched
//! for the lifetime of that connection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::UserId;

/// Marketplace role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// User record as owned by the account system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub email: String,
    pub is_suspended: bool,
}

/// The slice of a student's profile this core cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudentProfile {
    pub parent_control_enabled: bool,
}

/// Immutable identity attached to an authenticated connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub role: Role,
    pub name: String,
    pub email: String,
}

impl Identity {
    pub fn new(id: UserId, role: Role, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            role,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl From<&UserRecord> for Identity {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            role: user.role,
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Reasons a connection or request is refused authentication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No credential was presented.
    #[error("No token provided")]
    MissingToken,

    /// Token is malformed, has a bad signature, or lacks required claims.
    #[error("Invalid token")]
    InvalidToken,

    /// Token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the referenced user no longer exists.
    #[error("User not found")]
    UserNotFound,

    #[error("Account suspended")]
    AccountSuspended,

    /// Student account locked by parental control.
    #[error("Parent control enabled for this account")]
    ParentControlEnabled,

    /// Identity storage could not be reached.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if the account itself is locked, regardless of token.
    pub fn is_account_locked(&self) -> bool {
        matches!(self, AuthError::AccountSuspended | AuthError::ParentControlEnabled)
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
