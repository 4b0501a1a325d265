//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the chat core and the outside world. Adapters implement these ports.
//!
//! ## Inbound collaborators
//!
//! - `TokenVerifier` - Decode and verify handshake credentials
//! - `IdentityReader` - Read user accounts and student-profile flags
//!
//! ## Persistence
//!
//! - `MessageStore` - Room chat messages with delivery status
//! - `NotificationStore` - Admin-to-user notifications with read status

mod identity_reader;
mod message_store;
mod notification_store;
mod token_verifier;

pub use identity_reader::IdentityReader;
pub use message_store::MessageStore;
pub use notification_store::NotificationStore;
pub use token_verifier::{TokenClaims, TokenVerifier};
