//! In-memory identity directory.
//!
//! Stands in for the marketplace's user and student-profile collections in
//! tests and local development.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    DomainError, ErrorCode, Role, StudentProfile, UserId, UserRecord,
};
use crate::ports::IdentityReader;

/// In-memory user accounts and student profiles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityDirectory {
    users: Arc<RwLock<HashMap<UserId, UserRecord>>>,
    profiles: Arc<RwLock<HashMap<UserId, StudentProfile>>>,
    unavailable: Arc<RwLock<bool>>,
}

impl InMemoryIdentityDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a user account.
    pub async fn insert_user(&self, user: UserRecord) {
        self.users.write().await.insert(user.id.clone(), user);
    }

    /// Convenience for tests: insert an active account with derived name/email.
    pub async fn add_user(&self, id: &str, role: Role) -> UserRecord {
        let user = UserRecord {
            id: UserId::new(id).unwrap_or_else(|_| panic!("invalid test user id '{}'", id)),
            role,
            name: format!("User {}", id),
            email: format!("{}@example.com", id),
            is_suspended: false,
        };
        self.insert_user(user.clone()).await;
        user
    }

    pub async fn set_student_profile(&self, user_id: &UserId, profile: StudentProfile) {
        self.profiles.write().await.insert(user_id.clone(), profile);
    }

    pub async fn set_suspended(&self, user_id: &UserId, suspended: bool) {
        if let Some(user) = self.users.write().await.get_mut(user_id) {
            user.is_suspended = suspended;
        }
    }

    /// Make every lookup fail, simulating a storage outage.
    pub async fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.write().await = unavailable;
    }

    async fn check_available(&self) -> Result<(), DomainError> {
        if *self.unavailable.read().await {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Identity store unavailable",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl IdentityReader for InMemoryIdentityDirectory {
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
        self.check_available().await?;
        Ok(self.users.read().await.get(user_id).cloned())
    }

    async fn find_student_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StudentProfile>, DomainError> {
        self.check_available().await?;
        Ok(self.profiles.read().await.get(user_id).copied())
    }
}
