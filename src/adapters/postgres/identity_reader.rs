//! PostgreSQL implementation of IdentityReader.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::foundation::{DomainError, ErrorCode, Role, StudentProfile, UserId, UserRecord};
use crate::ports::IdentityReader;

/// Reads accounts and student profiles owned by the marketplace.
pub struct PostgresIdentityReader {
    pool: PgPool,
}

impl PostgresIdentityReader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    role: String,
    name: String,
    email: String,
    is_suspended: bool,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row.role.parse().map_err(|e: String| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid role value: {}", e))
        })?;

        Ok(UserRecord {
            id: UserId::new(row.id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e))
            })?,
            role,
            name: row.name,
            email: row.email,
            is_suspended: row.is_suspended,
        })
    }
}

#[async_trait]
impl IdentityReader for PostgresIdentityReader {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, role, name, email, is_suspended
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find user", e))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_student_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StudentProfile>, DomainError> {
        let flag: Option<bool> = sqlx::query_scalar(
            "SELECT parent_control_enabled FROM student_profiles WHERE user_id = $1",
        )
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::database("Failed to find student profile", e))?;

        Ok(flag.map(|parent_control_enabled| StudentProfile {
            parent_control_enabled,
        }))
    }
}
