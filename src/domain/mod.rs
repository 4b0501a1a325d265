//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (ids, timestamps, auth vocabulary, errors)
//! - `chat` - Room messages, delivery status, channels and moderation
//! - `notification` - Admin-to-user messages with read state

pub mod chat;
pub mod foundation;
pub mod notification;
