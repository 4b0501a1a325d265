//! In-memory adapters for every storage port.
//!
//! Used by the test suites and for running the server without PostgreSQL.
//! All state lives behind `tokio::sync::RwLock`s and is lost on restart.

mod identity_directory;
mod message_store;
mod notification_store;

pub use identity_directory::InMemoryIdentityDirectory;
pub use message_store::InMemoryMessageStore;
pub use notification_store::InMemoryNotificationStore;
