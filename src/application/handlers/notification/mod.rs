//! Admin direct-message (notification) handlers.

mod list_user_messages;
mod mark_admin_message_read;
mod send_admin_message;

pub use list_user_messages::{
    ListUserMessagesError, ListUserMessagesHandler, ListUserMessagesQuery,
};
pub use mark_admin_message_read::{
    MarkAdminMessageReadCommand, MarkAdminMessageReadError, MarkAdminMessageReadHandler,
};
pub use send_admin_message::{
    SendAdminMessageCommand, SendAdminMessageError, SendAdminMessageHandler,
    SendAdminMessageResult,
};
