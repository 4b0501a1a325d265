//! In-memory chat message store.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::chat::ChatMessage;
use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::ports::MessageStore;

/// In-memory message store.
///
/// Every mutation runs under one write lock, which gives the same
/// single-operation atomicity the SQL adapter gets from one `UPDATE`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMessageStore {
    messages: Arc<RwLock<Vec<ChatMessage>>>,
    failing: Arc<RwLock<bool>>,
}

impl InMemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail, simulating a storage outage.
    pub async fn set_failing(&self, failing: bool) {
        *self.failing.write().await = failing;
    }

    /// Messages in a room in insertion order.
    pub async fn messages_in_room(&self, room_id: &str) -> Vec<ChatMessage> {
        self.messages
            .read()
            .await
            .iter()
            .filter(|m| m.room_id == room_id)
            .cloned()
            .collect()
    }

    pub async fn message_count(&self) -> usize {
        self.messages.read().await.len()
    }

    async fn check_available(&self) -> Result<(), DomainError> {
        if *self.failing.read().await {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Message store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageStore for InMemoryMessageStore {
    async fn save(&self, message: &ChatMessage) -> Result<(), DomainError> {
        self.check_available().await?;
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn mark_room_seen(&self, room_id: &str, reader: &UserId) -> Result<u64, DomainError> {
        self.check_available().await?;
        let mut messages = self.messages.write().await;
        let mut changed = 0;
        for message in messages
            .iter_mut()
            .filter(|m| m.room_id == room_id && m.is_unseen_by(reader))
        {
            message.mark_seen();
            changed += 1;
        }
        Ok(changed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::MessageStatus;

    fn user(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[tokio::test]
    async fn save_appends_to_room() {
        let store = InMemoryMessageStore::new();
        let msg = ChatMessage::new("r1", user("a"), "Hello");

        store.save(&msg).await.unwrap();

        assert_eq!(store.messages_in_room("r1").await, vec![msg]);
        assert!(store.messages_in_room("r2").await.is_empty());
    }

    #[tokio::test]
    async fn mark_room_seen_skips_callers_own_messages() {
        let store = InMemoryMessageStore::new();
        let from_a = ChatMessage::new("r1", user("a"), "hi from a");
        let from_b = ChatMessage::new("r1", user("b"), "hi from b");
        store.save(&from_a).await.unwrap();
        store.save(&from_b).await.unwrap();

        let changed = store.mark_room_seen("r1", &user("b")).await.unwrap();

        assert_eq!(changed, 1);
        let statuses: Vec<MessageStatus> = store
            .messages_in_room("r1")
            .await
            .iter()
            .map(|m| m.status)
            .collect();
        assert_eq!(statuses, vec![MessageStatus::Seen, MessageStatus::Delivered]);
    }

    #[tokio::test]
    async fn mark_room_seen_is_scoped_to_the_room() {
        let store = InMemoryMessageStore::new();
        let other_room = ChatMessage::new("r2", user("a"), "elsewhere");
        store.save(&other_room).await.unwrap();

        assert_eq!(store.mark_room_seen("r1", &user("b")).await.unwrap(), 0);
        let untouched = store.messages_in_room("r2").await;
        assert_eq!(untouched[0].status, MessageStatus::Delivered);
    }

    #[tokio::test]
    async fn mark_room_seen_counts_only_transitions() {
        let store = InMemoryMessageStore::new();
        store.save(&ChatMessage::new("r1", user("a"), "x")).await.unwrap();

        assert_eq!(store.mark_room_seen("r1", &user("b")).await.unwrap(), 1);
        assert_eq!(store.mark_room_seen("r1", &user("b")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failing_store_rejects_writes() {
        let store = InMemoryMessageStore::new();
        store.set_failing(true).await;

        let err = store.save(&ChatMessage::new("r1", user("a"), "x")).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(store.message_count().await, 0);
    }
}
