//! SendChatMessage command handler.
//!
//! Screens the text with the moderation filter, then persists a new
//! `delivered` message. Flagged text is never written to the store.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::chat::{ChatMessage, ModerationFilter, FLAGGED_MESSAGE};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::MessageStore;

/// Command to post a message into a room.
#[derive(Debug, Clone)]
pub struct SendChatMessageCommand {
    pub room_id: String,
    pub sender_id: UserId,
    pub text: String,
}

/// Errors that can occur when sending a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendChatMessageError {
    /// Text matched the blocked-word list.
    #[error("{}", FLAGGED_MESSAGE)]
    Flagged,

    /// Message store rejected the write.
    #[error("Failed to send message")]
    Storage(String),
}

impl From<DomainError> for SendChatMessageError {
    fn from(err: DomainError) -> Self {
        SendChatMessageError::Storage(err.to_string())
    }
}

/// Handler for room messages.
pub struct SendChatMessageHandler {
    store: Arc<dyn MessageStore>,
    moderation: Arc<ModerationFilter>,
}

impl SendChatMessageHandler {
    pub fn new(store: Arc<dyn MessageStore>, moderation: Arc<ModerationFilter>) -> Self {
        Self { store, moderation }
    }

    pub async fn handle(
        &self,
        cmd: SendChatMessageCommand,
    ) -> Result<ChatMessage, SendChatMessageError> {
        if self.moderation.is_flagged(&cmd.text) {
            return Err(SendChatMessageError::Flagged);
        }

        let message = ChatMessage::new(cmd.room_id, cmd.sender_id, cmd.text);
        self.store.save(&message).await?;

        Ok(message)
    }
}
