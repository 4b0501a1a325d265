//! Identity lookup port.
//!
//! User accounts and student profiles are owned by the surrounding
//! marketplace. This core only reads them: once per connection during the
//! handshake, and once per admin message to resolve the recipient.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, StudentProfile, UserId, UserRecord};

/// Read access to user accounts and the student-profile flags the chat
/// core enforces.
///
/// # Contract
///
/// - `Ok(None)` means the record does not exist; it is not an error
/// - `Err(DomainError)` is reserved for storage failures
#[async_trait]
pub trait IdentityReader: Send + Sync {
    /// Look up a user account by id.
    async fn find_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError>;

    /// Look up the student profile linked to a user, if any.
    async fn find_student_profile(
        &self,
        user_id: &UserId,
    ) -> Result<Option<StudentProfile>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::Role;

    struct SingleUser(UserRecord);

    #[async_trait]
    impl IdentityReader for SingleUser {
        async fn find_user(&self, user_id: &UserId) -> Result<Option<UserRecord>, DomainError> {
            Ok((&self.0.id == user_id).then(|| self.0.clone()))
        }

        async fn find_student_profile(
            &self,
            _user_id: &UserId,
        ) -> Result<Option<StudentProfile>, DomainError> {
            Ok(None)
        }
    }

    fn reader() -> SingleUser {
        SingleUser(UserRecord {
            id: UserId::new("teacher-1").unwrap(),
            role: Role::Teacher,
            name: "Tina".to_string(),
            email: "tina@example.com".to_string(),
            is_suspended: false,
        })
    }

    #[tokio::test]
    async fn identity_reader_returns_existing_user() {
        let found = reader().find_user(&UserId::new("teacher-1").unwrap()).await.unwrap();
        assert_eq!(found.map(|u| u.email), Some("tina@example.com".to_string()));
    }

    #[tokio::test]
    async fn identity_reader_returns_none_for_unknown_user() {
        let found = reader().find_user(&UserId::new("ghost").unwrap()).await.unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn identity_reader_is_object_safe_and_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<std::sync::Arc<dyn IdentityReader>>();
    }
}
