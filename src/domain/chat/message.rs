//! Chat message entity and its delivery status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{MessageId, StateMachine, Timestamp, UserId, ValidationError};

/// Delivery status of a chat message.
///
/// Starts at `Delivered` once persisted and can only move to `Seen`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Delivered,
    Seen,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Delivered => "delivered",
            MessageStatus::Seen => "seen",
        }
    }
}

impl StateMachine for MessageStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (MessageStatus::Delivered, MessageStatus::Seen))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            MessageStatus::Delivered => vec![MessageStatus::Seen],
            MessageStatus::Seen => vec![],
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "delivered" => Ok(MessageStatus::Delivered),
            "seen" => Ok(MessageStatus::Seen),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown message status '{}'", other),
            )),
        }
    }
}

/// A persisted chat message in a room.
///
/// Immutable apart from `status`. `sender_id` is always the identity of
/// the connection that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub room_id: String,
    pub sender_id: UserId,
    pub text: String,
    pub status: MessageStatus,
    pub created_at: Timestamp,
}

impl ChatMessage {
    /// Creates a freshly delivered message.
    pub fn new(room_id: impl Into<String>, sender_id: UserId, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            room_id: room_id.into(),
            sender_id,
            text: text.into(),
            status: MessageStatus::Delivered,
            created_at: Timestamp::now(),
        }
    }

    /// Whether a `markRead` by `reader` should flip this message to seen.
    pub fn is_unseen_by(&self, reader: &UserId) -> bool {
        &self.sender_id != reader && self.status != MessageStatus::Seen
    }

    /// Marks the message as seen. No-op when it already is.
    pub fn mark_seen(&mut self) {
        if let Ok(next) = self.status.transition_to(MessageStatus::Seen) {
            self.status = next;
        }
    }
}
