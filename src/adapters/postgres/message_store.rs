//! PostgreSQL implementation of MessageStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::chat::{ChatMessage, MessageStatus};
use crate::domain::foundation::{DomainError, ErrorCode, MessageId, Timestamp, UserId};
use crate::ports::MessageStore;

/// PostgreSQL implementation of the MessageStore port.
pub struct PostgresMessageStore {
    pool: PgPool,
}

impl PostgresMessageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a chat message.
#[derive(Debug, sqlx::FromRow)]
struct ChatMessageRow {
    id: Uuid,
    room_id: String,
    sender_id: String,
    text: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChatMessageRow> for ChatMessage {
    type Error = DomainError;

    fn try_from(row: ChatMessageRow) -> Result<Self, Self::Error> {
        Ok(ChatMessage {
            id: MessageId::from_uuid(row.id),
            room_id: row.room_id,
            sender_id: UserId::new(row.sender_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid sender_id: {}", e))
            })?,
            text: row.text,
            status: parse_status(&row.status)?,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_status(s: &str) -> Result<MessageStatus, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid status value: {}", s),
        )
    })
}

#[async_trait]
impl MessageStore for PostgresMessageStore {
    async fn save(&self, message: &ChatMessage) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO chat_messages (id, room_id, sender_id, text, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(&message.room_id)
        .bind(message.sender_id.as_str())
        .bind(&message.text)
        .bind(message.status.as_str())
        .bind(message.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to save message", e))?;

        Ok(())
    }

    async fn mark_room_seen(&self, room_id: &str, reader: &UserId) -> Result<u64, DomainError> {
        // One conditional UPDATE: no read-modify-write window.
        let result = sqlx::query(
            r#"
            UPDATE chat_messages
            SET status = 'seen'
            WHERE room_id = $1
              AND sender_id <> $2
              AND status <> 'seen'
            "#,
        )
        .bind(room_id)
        .bind(reader.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to mark messages as seen", e))?;

        Ok(result.rows_affected())
    }
}
