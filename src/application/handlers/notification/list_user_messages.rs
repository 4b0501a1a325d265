//! ListUserMessages query handler.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::foundation::{DomainError, Identity, UserId};
use crate::domain::notification::Notification;
use crate::ports::NotificationStore;

/// Query for a user's admin messages. Only the user or an admin may ask.
#[derive(Debug, Clone)]
pub struct ListUserMessagesQuery {
    pub requester: Identity,
    pub user_id: UserId,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListUserMessagesError {
    #[error("Not authorized to view these messages")]
    Forbidden,

    #[error("Failed to fetch messages")]
    Storage(String),
}

impl From<DomainError> for ListUserMessagesError {
    fn from(err: DomainError) -> Self {
        ListUserMessagesError::Storage(err.to_string())
    }
}

pub struct ListUserMessagesHandler {
    store: Arc<dyn NotificationStore>,
}

impl ListUserMessagesHandler {
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Newest first.
    pub async fn handle(
        &self,
        query: ListUserMessagesQuery,
    ) -> Result<Vec<Notification>, ListUserMessagesError> {
        if query.requester.id != query.user_id && !query.requester.is_admin() {
            return Err(ListUserMessagesError::Forbidden);
        }

        Ok(self.store.list_for_user(&query.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryNotificationStore;
    use crate::domain::foundation::Role;

    fn identity(id: &str, role: Role) -> Identity {
        Identity::new(UserId::new(id).unwrap(), role, id, format!("{}@example.com", id))
    }

    async fn handler_with_one_message_for(user: &str) -> ListUserMessagesHandler {
        let store = InMemoryNotificationStore::new();
        store
            .save(&Notification::new(UserId::new(user).unwrap(), None, "hi"))
            .await
            .unwrap();
        ListUserMessagesHandler::new(Arc::new(store))
    }

    #[tokio::test]
    async fn user_can_list_own_messages() {
        let handler = handler_with_one_message_for("t1").await;

        let listed = handler
            .handle(ListUserMessagesQuery {
                requester: identity("t1", Role::Teacher),
                user_id: UserId::new("t1").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn admin_can_list_anyones_messages() {
        let handler = handler_with_one_message_for("t1").await;

        let listed = handler
            .handle(ListUserMessagesQuery {
                requester: identity("a1", Role::Admin),
                user_id: UserId::new("t1").unwrap(),
            })
            .await
            .unwrap();

        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let handler = handler_with_one_message_for("t1").await;

        let result = handler
            .handle(ListUserMessagesQuery {
                requester: identity("s1", Role::Student),
                user_id: UserId::new("t1").unwrap(),
            })
            .await;

        assert_eq!(result.unwrap_err(), ListUserMessagesError::Forbidden);
    }
}
