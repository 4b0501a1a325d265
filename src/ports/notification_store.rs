//! Notification store port.
//!
//! Holds one-way admin messages. Like the message store it is shared
//! across connections, so the read flag is set with a single conditional
//! update rather than fetch-then-save.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId, UserId};
use crate::domain::notification::Notification;

/// Persistence contract for admin-to-user notifications.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Persist a new notification.
    async fn save(&self, notification: &Notification) -> Result<(), DomainError>;

    /// Set `is_read = true` and return the updated record.
    ///
    /// Returns `None` if no notification has this id. Marking an already
    /// read notification succeeds and leaves it read.
    async fn mark_read(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError>;

    /// All notifications addressed to a user, newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, DomainError>;
}
