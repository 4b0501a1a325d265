//! PostgreSQL adapters - Database implementations for store ports.
//!
//! - `PostgresMessageStore` - Room chat messages
//! - `PostgresNotificationStore` - Admin direct messages
//! - `PostgresIdentityReader` - Read-only access to accounts and student profiles
//!
//! Schema lives in `migrations/` and is applied with `sqlx::migrate!`.

mod identity_reader;
mod message_store;
mod notification_store;

pub use identity_reader::PostgresIdentityReader;
pub use message_store::PostgresMessageStore;
pub use notification_store::PostgresNotificationStore;

/// Embedded schema migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
