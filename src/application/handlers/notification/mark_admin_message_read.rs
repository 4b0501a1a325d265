//! MarkAdminMessageRead command handler.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, NotificationId};
use crate::domain::notification::Notification;
use crate::ports::NotificationStore;

#[derive(Debug, Clone)]
pub struct MarkAdminMessageReadCommand {
    pub message_id: NotificationId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkAdminMessageReadError {
    #[error("Message not found")]
    NotFound,

    #[error("Failed to mark message as read")]
    Storage(String),
}

impl From<DomainError> for MarkAdminMessageReadError {
    fn from(err: DomainError) -> Self {
        MarkAdminMessageReadError::Storage(err.to_string())
    }
}

/// Flips an admin message to read. Idempotent.
pub struct MarkAdminMessageReadHandler {
    store: Arc<dyn NotificationStore>,
}

impl MarkAdminMessageReadHandler {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: MarkAdminMessageReadCommand,
    ) -> Result<Notification, MarkAdminMessageReadError> {
        self.store
            .mark_read(&cmd.message_id)
            .await?
            .ok_or(MarkAdminMessageReadError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryNotificationStore;
    use crate::domain::foundation::UserId;

    #[tokio::test]
    async fn marks_existing_message_read() {
        let store = InMemoryNotificationStore::new();
        let n = Notification::new(UserId::new("t1").unwrap(), None, "hello");
        store.save(&n).await.unwrap();
        let handler = MarkAdminMessageReadHandler::new(Arc::new(store.clone()));

        let updated = handler
            .handle(MarkAdminMessageReadCommand { message_id: n.id })
            .await
            .unwrap();

        assert!(updated.is_read);
        let stored = store.list_for_user(&n.user_id).await.unwrap();
        assert!(stored[0].is_read);
    }

    #[tokio::test]
    async fn unknown_message_is_not_found() {
        let handler = MarkAdminMessageReadHandler::new(Arc::new(InMemoryNotificationStore::new()));

        let result = handler
            .handle(MarkAdminMessageReadCommand {
                message_id: NotificationId::new(),
            })
            .await;

        assert_eq!(result.unwrap_err(), MarkAdminMessageReadError::NotFound);
    }
}
