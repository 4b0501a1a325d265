//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod chat;
pub mod connection;
pub mod notification;

pub use chat::{
    MarkRoomReadCommand, MarkRoomReadError, MarkRoomReadHandler, SendChatMessageCommand,
    SendChatMessageError, SendChatMessageHandler,
};
pub use connection::ConnectionAuthenticator;
pub use notification::{
    ListUserMessagesError, ListUserMessagesHandler, ListUserMessagesQuery,
    MarkAdminMessageReadCommand, MarkAdminMessageReadError, MarkAdminMessageReadHandler,
    SendAdminMessageCommand, SendAdminMessageError, SendAdminMessageHandler,
    SendAdminMessageResult,
};
