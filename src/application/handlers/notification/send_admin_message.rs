//! SendAdminMessage command handler.
//!
//! Stores a direct message from an admin to one user. Delivery to the
//! recipient's admin channel is left to the caller, which owns the
//! connection registry.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, Identity, UserId, UserRecord};
use crate::domain::notification::Notification;
use crate::ports::{IdentityReader, NotificationStore};

/// Command to send an admin message.
#[derive(Debug, Clone)]
pub struct SendAdminMessageCommand {
    /// Who is sending. Must be an admin.
    pub sender: Identity,
    pub recipient_id: UserId,
    pub title: Option<String>,
    pub message: String,
}

/// Result of a stored admin message.
#[derive(Debug, Clone)]
pub struct SendAdminMessageResult {
    pub notification: Notification,
    pub recipient: UserRecord,
}

/// Errors that can occur when sending an admin message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendAdminMessageError {
    #[error("Only admins can send admin messages")]
    Forbidden,

    #[error("User not found")]
    RecipientNotFound,

    #[error("Failed to send message")]
    Storage(String),
}

impl From<DomainError> for SendAdminMessageError {
    fn from(err: DomainError) -> Self {
        SendAdminMessageError::Storage(err.to_string())
    }
}

/// Handler for admin direct messages.
pub struct SendAdminMessageHandler {
    identities: Arc<dyn IdentityReader>,
    store: Arc<dyn NotificationStore>,
}

impl SendAdminMessageHandler {
    pub fn new(identities: Arc<dyn IdentityReader>, store: Arc<dyn NotificationStore>) -> Self {
        Self { identities, store }
    }

    pub async fn handle(
        &self,
        cmd: SendAdminMessageCommand,
    ) -> Result<SendAdminMessageResult, SendAdminMessageError> {
        if !cmd.sender.is_admin() {
            return Err(SendAdminMessageError::Forbidden);
        }

        let recipient = self
            .identities
            .find_user(&cmd.recipient_id)
            .await?
            .ok_or(SendAdminMessageError::RecipientNotFound)?;

        let notification = Notification::new(recipient.id.clone(), cmd.title, cmd.message);
        self.store.save(&notification).await?;

        tracing::info!(
            user_id = %cmd.sender.id,
            recipient_id = %recipient.id,
            message_id = %notification.id,
            "Admin message stored"
        );

        Ok(SendAdminMessageResult {
            notification,
            recipient,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryIdentityDirectory, InMemoryNotificationStore};
    use crate::domain::foundation::Role;
    use crate::domain::notification::DEFAULT_ADMIN_TITLE;

    struct Fixture {
        handler: SendAdminMessageHandler,
        store: InMemoryNotificationStore,
        admin: Identity,
        teacher: Identity,
    }

    async fn fixture() -> Fixture {
        let directory = InMemoryIdentityDirectory::new();
        let admin = directory.add_user("a1", Role::Admin).await;
        let teacher = directory.add_user("t1", Role::Teacher).await;
        let store = InMemoryNotificationStore::new();
        Fixture {
            handler: SendAdminMessageHandler::new(
                Arc::new(directory),
                Arc::new(store.clone()),
            ),
            store,
            admin: Identity::from(&admin),
            teacher: Identity::from(&teacher),
        }
    }

    fn command(sender: &Identity, recipient: &str, title: Option<&str>) -> SendAdminMessageCommand {
        SendAdminMessageCommand {
            sender: sender.clone(),
            recipient_id: UserId::new(recipient).unwrap(),
            title: title.map(String::from),
            message: "Please update your profile".to_string(),
        }
    }

    #[tokio::test]
    async fn admin_message_is_stored_unread_with_default_title() {
        let f = fixture().await;

        let result = f.handler.handle(command(&f.admin, "t1", None)).await.unwrap();

        assert_eq!(result.recipient.email, "t1@example.com");
        assert_eq!(result.notification.title, DEFAULT_ADMIN_TITLE);
        assert!(!result.notification.is_read);
        assert_eq!(f.store.notification_count().await, 1);
    }

    #[tokio::test]
    async fn explicit_title_is_kept() {
        let f = fixture().await;

        let result = f
            .handler
            .handle(command(&f.admin, "t1", Some("Schedule change")))
            .await
            .unwrap();

        assert_eq!(result.notification.title, "Schedule change");
    }

    #[tokio::test]
    async fn non_admin_is_forbidden_before_lookup() {
        let f = fixture().await;

        let result = f.handler.handle(command(&f.teacher, "nobody", None)).await;

        assert_eq!(result.unwrap_err(), SendAdminMessageError::Forbidden);
        assert_eq!(f.store.notification_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_recipient_is_not_found() {
        let f = fixture().await;

        let result = f.handler.handle(command(&f.admin, "nobody", None)).await;

        assert_eq!(result.unwrap_err(), SendAdminMessageError::RecipientNotFound);
        assert_eq!(f.store.notification_count().await, 0);
    }

    #[tokio::test]
    async fn storage_failure_is_reported() {
        let f = fixture().await;
        f.store.set_failing(true).await;

        let result = f.handler.handle(command(&f.admin, "t1", None)).await;

        assert!(matches!(result, Err(SendAdminMessageError::Storage(_))));
    }
}
