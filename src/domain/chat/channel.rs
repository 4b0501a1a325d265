//! Broadcast channel identifiers.
//!
//! Two disjoint families share one registry:
//!
//! ```text
//! Room("r1")            client-supplied match/conversation id
//! Admin(user-42)  ->    "admin_user-42", one-way admin messages to one user
//! ```
//!
//! The families never collide, even when a client picks a room id that
//! looks like an admin channel.

use std::fmt;

use crate::domain::foundation::UserId;

/// Literal prefix of an admin channel identifier.
pub const ADMIN_CHANNEL_PREFIX: &str = "admin_";

/// Identifier of an ephemeral broadcast group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChannelId {
    /// Chat room keyed by the client-supplied room id.
    Room(String),
    /// Admin notification channel owned by one user.
    Admin(UserId),
}

impl ChannelId {
    pub fn room(room_id: impl Into<String>) -> Self {
        ChannelId::Room(room_id.into())
    }

    /// The admin channel a user receives one-way admin messages on.
    pub fn admin_for(user_id: &UserId) -> Self {
        ChannelId::Admin(user_id.clone())
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, ChannelId::Admin(_))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelId::Room(room_id) => f.write_str(room_id),
            ChannelId::Admin(user_id) => write!(f, "{}{}", ADMIN_CHANNEL_PREFIX, user_id),
        }
    }
}
