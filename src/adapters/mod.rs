//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the chat core to external systems:
//! - `auth` - Token verification (HS256 JWT, mock)
//! - `memory` - In-memory stores for tests and local runs
//! - `postgres` - sqlx-backed stores
//! - `websocket` - Realtime protocol, channel fan-out, upgrade handler
//! - `http` - Notification REST endpoints and bearer middleware

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod websocket;

pub use auth::{JwtTokenVerifier, MockTokenVerifier};
pub use memory::{InMemoryIdentityDirectory, InMemoryMessageStore, InMemoryNotificationStore};
pub use postgres::{PostgresIdentityReader, PostgresMessageStore, PostgresNotificationStore};
pub use websocket::{ChannelRegistry, RealtimeDispatcher, WebSocketState};
