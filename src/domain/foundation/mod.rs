//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, auth vocabulary and error types
//! shared by the chat and notification domains.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, Identity, Role, StudentProfile, UserRecord};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{MessageId, NotificationId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
