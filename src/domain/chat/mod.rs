//! Chat domain: room messages, their delivery status, channel identifiers
//! and the content policy applied before anything is stored.

mod channel;
mod message;
mod moderation;

pub use channel::{ChannelId, ADMIN_CHANNEL_PREFIX};
pub use message::{ChatMessage, MessageStatus};
pub use moderation::{ModerationFilter, DEFAULT_BLOCKED_WORDS, FLAGGED_MESSAGE};
