//! MarkRoomRead command handler.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, UserId};
use crate::ports::MessageStore;

/// Command to mark every message in a room as seen by `reader`.
#[derive(Debug, Clone)]
pub struct MarkRoomReadCommand {
    pub room_id: String,
    pub reader: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkRoomReadError {
    #[error("Failed to mark messages as read")]
    Storage(String),
}

impl From<DomainError> for MarkRoomReadError {
    fn from(err: DomainError) -> Self {
        MarkRoomReadError::Storage(err.to_string())
    }
}

/// Handler for bulk read receipts.
///
/// Messages sent by the reader are never touched, and `seen` messages stay
/// `seen`. Returns how many messages changed.
pub struct MarkRoomReadHandler {
    store: Arc<dyn MessageStore>,
}

impl MarkRoomReadHandler {
    pub fn new(store: Arc<dyn MessageStore>) -> Self {
        Self { store }
    }

    pub async fn handle(&self, cmd: MarkRoomReadCommand) -> Result<u64, MarkRoomReadError> {
        let changed = self.store.mark_room_seen(&cmd.room_id, &cmd.reader).await?;
        tracing::debug!(room_id = %cmd.room_id, user_id = %cmd.reader, changed, "Room marked read");
        Ok(changed)
    }
}
