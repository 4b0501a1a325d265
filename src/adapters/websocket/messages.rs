//! WebSocket message types for the realtime chat protocol.
//!
//! Every frame is a JSON text frame shaped as an event envelope:
//!
//! ```json
//! {"event": "sendMessage", "data": {"roomId": "r1", "text": "Hello"}}
//! ```
//!
//! - Client → Server: room chat, read receipts, admin messaging
//! - Server → Client: acknowledgements, fan-out events, errors
//!
//! Client payload fields are all optional on the wire. Presence checks
//! live in the accessors on each payload so that a missing field and an
//! empty string are treated the same way.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::domain::chat::{ChatMessage, MessageStatus};
use crate::domain::notification::Notification;

// ============================================
// Client → Server Messages
// ============================================

/// All events that can be received from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    JoinRoom(RoomPayload),
    Typing(TypingPayload),
    SendMessage(SendMessagePayload),
    MarkRead(RoomPayload),
    JoinAdminChannel(JoinAdminChannelPayload),
    JoinUserNotifications,
    SendAdminMessage(SendAdminMessagePayload),
    MarkAdminMessageRead(MarkAdminMessageReadPayload),
}

/// Why an inbound frame could not be turned into a `ClientEvent`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    #[error("Malformed frame: {0}")]
    Malformed(String),

    #[error("Unknown event: {0}")]
    UnknownEvent(String),
}

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    event: String,
    #[serde(default)]
    data: Value,
}

impl ClientEvent {
    /// Decodes one text frame.
    pub fn parse(frame: &str) -> Result<Self, ProtocolError> {
        let envelope: RawEnvelope =
            serde_json::from_str(frame).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

        // Socket clients routinely send events without a payload.
        let data = if envelope.data.is_null() {
            Value::Object(Default::default())
        } else {
            envelope.data
        };

        let event = match envelope.event.as_str() {
            "joinRoom" => ClientEvent::JoinRoom(payload(data)?),
            "typing" => ClientEvent::Typing(payload(data)?),
            "sendMessage" => ClientEvent::SendMessage(payload(data)?),
            "markRead" => ClientEvent::MarkRead(payload(data)?),
            "joinAdminChannel" => ClientEvent::JoinAdminChannel(payload(data)?),
            "joinUserNotifications" => ClientEvent::JoinUserNotifications,
            "sendAdminMessage" => ClientEvent::SendAdminMessage(payload(data)?),
            "markAdminMessageRead" => ClientEvent::MarkAdminMessageRead(payload(data)?),
            other => return Err(ProtocolError::UnknownEvent(other.to_string())),
        };

        Ok(event)
    }

    /// Wire name of the event, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom(_) => "joinRoom",
            ClientEvent::Typing(_) => "typing",
            ClientEvent::SendMessage(_) => "sendMessage",
            ClientEvent::MarkRead(_) => "markRead",
            ClientEvent::JoinAdminChannel(_) => "joinAdminChannel",
            ClientEvent::JoinUserNotifications => "joinUserNotifications",
            ClientEvent::SendAdminMessage(_) => "sendAdminMessage",
            ClientEvent::MarkAdminMessageRead(_) => "markAdminMessageRead",
        }
    }
}

fn payload<T: for<'de> Deserialize<'de>>(data: Value) -> Result<T, ProtocolError> {
    serde_json::from_value(data).map_err(|e| ProtocolError::Malformed(e.to_string()))
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

/// Payload for `joinRoom` and `markRead`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    pub room_id: Option<String>,
}

impl RoomPayload {
    pub fn room_id(&self) -> Option<&str> {
        present(&self.room_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub room_id: Option<String>,
    pub is_typing: Option<bool>,
}

impl TypingPayload {
    pub fn room_id(&self) -> Option<&str> {
        present(&self.room_id)
    }

    /// Absent means the client stopped typing.
    pub fn is_typing(&self) -> bool {
        self.is_typing.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub room_id: Option<String>,
    pub text: Option<String>,
}

impl SendMessagePayload {
    /// Both fields, or `None` if either is missing or empty.
    pub fn required(&self) -> Option<(&str, &str)> {
        Some((present(&self.room_id)?, present(&self.text)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinAdminChannelPayload {
    pub user_id: Option<String>,
}

impl JoinAdminChannelPayload {
    pub fn user_id(&self) -> Option<&str> {
        present(&self.user_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendAdminMessagePayload {
    pub recipient_id: Option<String>,
    pub message: Option<String>,
    pub title: Option<String>,
}

impl SendAdminMessagePayload {
    /// Recipient and body, or `None` if either is missing or empty.
    pub fn required(&self) -> Option<(&str, &str)> {
        Some((present(&self.recipient_id)?, present(&self.message)?))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkAdminMessageReadPayload {
    pub message_id: Option<String>,
}

impl MarkAdminMessageReadPayload {
    pub fn message_id(&self) -> Option<&str> {
        present(&self.message_id)
    }
}

// ============================================
// Server → Client Messages
// ============================================

/// All events that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerEvent {
    JoinedRoom(JoinedRoomData),
    Typing(TypingData),
    NewMessage(NewMessageData),
    MessageError(MessageErrorData),
    MessagesRead(MessagesReadData),
    JoinedAdminChannel(JoinedAdminChannelData),
    JoinedUserNotifications(JoinedUserNotificationsData),
    NewAdminMessage(AdminMessageData),
    AdminMessageSent(AdminMessageSentData),
    AdminMessageRead(AdminMessageReadData),
    Error(ErrorData),
}

impl ServerEvent {
    /// Generic error to the caller.
    pub fn error(message: impl Into<String>) -> Self {
        ServerEvent::Error(ErrorData {
            message: message.into(),
        })
    }

    /// Serializes to a text frame.
    pub fn to_frame(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedRoomData {
    pub room_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingData {
    pub room_id: String,
    pub user_id: String,
    pub name: String,
    pub is_typing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageData {
    #[serde(rename = "_id")]
    pub id: String,
    pub room_id: String,
    pub sender_id: String,
    pub sender_name: String,
    pub text: String,
    pub created_at: String,
    pub status: MessageStatus,
}

impl NewMessageData {
    pub fn from_message(message: &ChatMessage, sender_name: &str) -> Self {
        Self {
            id: message.id.to_string(),
            room_id: message.room_id.clone(),
            sender_id: message.sender_id.to_string(),
            sender_name: sender_name.to_string(),
            text: message.text.clone(),
            created_at: message.created_at.to_rfc3339(),
            status: message.status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageErrorData {
    pub room_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagesReadData {
    pub room_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedAdminChannelData {
    pub channel_id: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinedUserNotificationsData {
    pub channel_id: String,
}

/// An admin message as delivered to its recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessageData {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub message: String,
    pub sender_name: String,
    pub created_at: String,
    pub is_read: bool,
}

impl AdminMessageData {
    pub fn from_notification(notification: &Notification, sender_name: &str) -> Self {
        Self {
            id: notification.id.to_string(),
            title: notification.title.clone(),
            message: notification.message.clone(),
            sender_name: sender_name.to_string(),
            created_at: notification.created_at.to_rfc3339(),
            is_read: notification.is_read,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessageSentData {
    pub recipient_id: String,
    pub recipient_email: String,
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminMessageReadData {
    pub message_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorData {
    pub message: String,
}
