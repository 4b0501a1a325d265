//! Chat room command handlers.

mod mark_room_read;
mod send_chat_message;

pub use mark_room_read::{MarkRoomReadCommand, MarkRoomReadError, MarkRoomReadHandler};
pub use send_chat_message::{
    SendChatMessageCommand, SendChatMessageError, SendChatMessageHandler,
};
