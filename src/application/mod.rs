//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Transport adapters (WebSocket, HTTP) translate their inputs into these
//! commands and fan the results out to connections.

pub mod handlers;

pub use handlers::{
    ConnectionAuthenticator, ListUserMessagesHandler, MarkAdminMessageReadHandler,
    MarkRoomReadHandler, SendAdminMessageHandler, SendChatMessageHandler,
};
