//! In-memory notification store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId, UserId};
use crate::domain::notification::Notification;
use crate::ports::NotificationStore;

/// In-memory notification store keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<HashMap<NotificationId, Notification>>>,
    failing: Arc<RwLock<bool>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail, simulating a storage outage.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    pub async fn notification_count(&self) -> usize {
        self.notifications.read().await.len()
    }

    async fn check_available(&self) -> Result<(), DomainError> {
        if *self.failing.read().await {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Notification store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        self.check_available().await?;
        self.notifications
            .write()
            .await
            .insert(notification.id, notification.clone());
        Ok(())
    }

    async fn mark_read(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError> {
        self.check_available().await?;
        let mut notifications = self.notifications.write().await;
        Ok(notifications.get_mut(id).map(|n| {
            n.mark_read();
            n.clone()
        }))
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Notification>, DomainError> {
        self.check_available().await?;
        let mut found: Vec<Notification> = self
            .notifications
            .read()
            .await
            .values()
            .filter(|n| &n.user_id == user_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn mark_read_sets_flag_and_returns_record() {
        let store = InMemoryNotificationStore::new();
        let n = Notification::new(user("f"), None, "Welcome");
        store.save(&n).await.unwrap();

        let updated = store.mark_read(&n.id).await.unwrap().unwrap();

        assert!(updated.is_read);
        let listed = store.list_for_user(&user("f")).await.unwrap();
        assert!(listed[0].is_read);
    }

    #[tokio::test]
    async fn mark_read_unknown_id_returns_none() {
        let store = InMemoryNotificationStore::new();
        assert!(store.mark_read(&NotificationId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn mark_read_twice_stays_read() {
        let store = InMemoryNotificationStore::new();
        let n = Notification::new(user("f"), None, "Welcome");
        store.save(&n).await.unwrap();

        store.mark_read(&n.id).await.unwrap();
        let again = store.mark_read(&n.id).await.unwrap().unwrap();

        assert!(again.is_read);
    }

    #[tokio::test]
    async fn list_for_user_filters_and_orders_newest_first() {
        let store = InMemoryNotificationStore::new();
        let first = Notification::new(user("f"), None, "first");
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let second = Notification::new(user("f"), None, "second");
        let other = Notification::new(user("g"), None, "not yours");
        for n in [&first, &second, &other] {
            store.save(n).await.unwrap();
        }

        let listed = store.list_for_user(&user("f")).await.unwrap();

        let bodies: Vec<&str> = listed.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(bodies, vec!["second", "first"]);
    }
}
