//! Request and response bodies for the notification endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::notification::Notification;

/// Body of `POST /api/notifications/direct`.
///
/// Either `recipientId` or `userId` names the recipient; `recipientId`
/// wins when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendDirectMessageRequest {
    pub recipient_id: Option<String>,
    pub user_id: Option<String>,
    pub message: Option<String>,
    pub title: Option<String>,
}

impl SendDirectMessageRequest {
    pub fn target_user_id(&self) -> Option<&str> {
        [&self.recipient_id, &self.user_id]
            .into_iter()
            .filter_map(|id| id.as_deref())
            .find(|id| !id.is_empty())
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id.to_string(),
            user_id: n.user_id.to_string(),
            title: n.title.clone(),
            message: n.message.clone(),
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// A single notification with a status line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationEnvelope {
    pub message: String,
    pub notification: NotificationResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageListResponse {
    pub message: String,
    pub count: usize,
    pub messages: Vec<NotificationResponse>,
}

impl MessageListResponse {
    pub fn new(notifications: &[Notification]) -> Self {
        Self {
            message: "Messages fetched".to_string(),
            count: notifications.len(),
            messages: notifications.iter().map(NotificationResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code("BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code("NOT_FOUND", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::with_code("FORBIDDEN", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_code("INTERNAL_ERROR", message)
    }

    fn with_code(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}
