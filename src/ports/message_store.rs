//! Chat message store port.
//!
//! Shared and concurrently mutated by every connection. Each mutation is a
//! single storage operation so concurrent senders and readers never race
//! through a read-modify-write cycle.

use async_trait::async_trait;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{DomainError, UserId};

/// Persistence contract for room chat messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist a new message.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, message: &ChatMessage) -> Result<(), DomainError>;

    /// Flip every message in `room_id` not sent by `reader` and not yet
    /// seen to `seen`, as one conditional update.
    ///
    /// Returns the number of messages that changed.
    async fn mark_room_seen(&self, room_id: &str, reader: &UserId) -> Result<u64, DomainError>;
}
