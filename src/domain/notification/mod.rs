//! One-way admin-to-user messages.

mod aggregate;

pub use aggregate::{Notification, DEFAULT_ADMIN_TITLE};
