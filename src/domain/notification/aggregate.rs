//! Notification entity.

use crate::domain::foundation::{NotificationId, Timestamp, UserId};

/// Title used when an admin sends a message without one.
pub const DEFAULT_ADMIN_TITLE: &str = "Message from Admin";

/// A persisted admin message addressed to one user.
///
/// `is_read` only ever flips from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: NotificationId,
    pub user_id: UserId,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl Notification {
    /// Creates an unread notification. A missing or blank title falls back
    /// to [`DEFAULT_ADMIN_TITLE`].
    pub fn new(user_id: UserId, title: Option<String>, message: impl Into<String>) -> Self {
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADMIN_TITLE.to_string());

        Self {
            id: NotificationId::new(),
            user_id,
            title,
            message: message.into(),
            is_read: false,
            created_at: Timestamp::now(),
        }
    }

    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}
