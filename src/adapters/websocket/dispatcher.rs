//! Realtime dispatcher connecting client events to handlers and channels.
//!
//! # Event Flow
//!
//! ```text
//! Client frame
//!      │
//!      ▼
//! ┌────────────────────┐
//! │ ClientEvent::parse │
//! └────────────────────┘
//!      │
//!      ▼
//! ┌────────────────────┐
//! │ RealtimeDispatcher │  presence/role checks, moderation
//! │   dispatch()       │
//! └────────────────────┘
//!      │
//!      ▼
//! ┌────────────────────┐
//! │ Application handler│  persistence via ports
//! └────────────────────┘
//!      │
//!      ▼
//! ┌────────────────────┐
//! │  ChannelRegistry   │  fan-out to member outboxes
//! └────────────────────┘
//! ```
//!
//! Missing or empty required fields make an event a silent no-op. Role,
//! not-found, moderation, and storage failures are reported to the caller
//! only. A failure never affects other connections.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::handlers::{
    MarkAdminMessageReadCommand, MarkAdminMessageReadError, MarkAdminMessageReadHandler,
    MarkRoomReadCommand, MarkRoomReadHandler, SendAdminMessageCommand, SendAdminMessageError,
    SendAdminMessageHandler, SendAdminMessageResult, SendChatMessageCommand,
    SendChatMessageError, SendChatMessageHandler,
};
use crate::domain::chat::{ChannelId, ModerationFilter};
use crate::domain::foundation::{Identity, NotificationId, UserId};
use crate::ports::{IdentityReader, MessageStore, NotificationStore};

use super::messages::{
    AdminMessageData, AdminMessageReadData, AdminMessageSentData, ClientEvent,
    JoinAdminChannelPayload, JoinedAdminChannelData, JoinedRoomData,
    JoinedUserNotificationsData, MarkAdminMessageReadPayload, MessageErrorData,
    MessagesReadData, NewMessageData, RoomPayload, SendAdminMessagePayload,
    SendMessagePayload, ServerEvent, TypingData, TypingPayload,
};
use super::rooms::{ChannelRegistry, ConnectionId};

const ADMIN_ONLY_JOIN: &str = "Only admins can join admin channels";

/// One authenticated connection.
///
/// Dropping the session removes every channel membership it holds, so a
/// socket task that ends for any reason cleans up after itself.
pub struct ConnectionSession {
    connection_id: ConnectionId,
    identity: Identity,
    registry: Arc<ChannelRegistry>,
}

impl ConnectionSession {
    pub fn connection_id(&self) -> ConnectionId {
        self.connection_id
    }

    /// Identity snapshot taken at handshake.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }
}

impl Drop for ConnectionSession {
    fn drop(&mut self) {
        self.registry.remove_connection(self.connection_id);
        tracing::info!(
            connection_id = %self.connection_id,
            user_id = %self.identity.id,
            "Client disconnected"
        );
    }
}

impl std::fmt::Debug for ConnectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSession")
            .field("connection_id", &self.connection_id)
            .field("user_id", &self.identity.id)
            .finish()
    }
}

/// Routes client events for every connection on this process.
pub struct RealtimeDispatcher {
    registry: Arc<ChannelRegistry>,
    send_chat: SendChatMessageHandler,
    mark_room_read: MarkRoomReadHandler,
    send_admin: SendAdminMessageHandler,
    mark_admin_read: MarkAdminMessageReadHandler,
}

impl RealtimeDispatcher {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        messages: Arc<dyn MessageStore>,
        notifications: Arc<dyn NotificationStore>,
        identities: Arc<dyn IdentityReader>,
        moderation: Arc<ModerationFilter>,
    ) -> Self {
        Self {
            registry,
            send_chat: SendChatMessageHandler::new(messages.clone(), moderation),
            mark_room_read: MarkRoomReadHandler::new(messages),
            send_admin: SendAdminMessageHandler::new(identities, notifications.clone()),
            mark_admin_read: MarkAdminMessageReadHandler::new(notifications),
        }
    }

    pub fn registry(&self) -> &Arc<ChannelRegistry> {
        &self.registry
    }

    /// Registers an authenticated connection. The receiver carries every
    /// event addressed to it.
    pub fn connect(
        &self,
        identity: Identity,
    ) -> (ConnectionSession, mpsc::Receiver<ServerEvent>) {
        let (connection_id, outbox) = self.registry.register();
        tracing::info!(
            %connection_id,
            user_id = %identity.id,
            role = identity.role.as_str(),
            "Client connected"
        );

        let session = ConnectionSession {
            connection_id,
            identity,
            registry: self.registry.clone(),
        };
        (session, outbox)
    }

    /// Handles one client event to completion.
    pub async fn dispatch(&self, session: &ConnectionSession, event: ClientEvent) {
        tracing::debug!(
            connection_id = %session.connection_id,
            user_id = %session.identity.id,
            event = event.name(),
            "Dispatching client event"
        );

        match event {
            ClientEvent::JoinRoom(payload) => self.join_room(session, payload),
            ClientEvent::Typing(payload) => self.typing(session, payload),
            ClientEvent::SendMessage(payload) => self.send_message(session, payload).await,
            ClientEvent::MarkRead(payload) => self.mark_read(session, payload).await,
            ClientEvent::JoinAdminChannel(payload) => self.join_admin_channel(session, payload),
            ClientEvent::JoinUserNotifications => self.join_user_notifications(session),
            ClientEvent::SendAdminMessage(payload) => {
                self.send_admin_message(session, payload).await
            }
            ClientEvent::MarkAdminMessageRead(payload) => {
                self.mark_admin_message_read(session, payload).await
            }
        }
    }

    /// Pushes a stored admin message to the recipient's admin channel.
    ///
    /// Shared by the socket event and the REST endpoint. Returns how many
    /// recipient connections received it.
    pub fn publish_admin_message(
        &self,
        result: &SendAdminMessageResult,
        sender_name: &str,
    ) -> usize {
        let event = ServerEvent::NewAdminMessage(AdminMessageData::from_notification(
            &result.notification,
            sender_name,
        ));
        self.registry
            .broadcast(&ChannelId::admin_for(&result.recipient.id), &event)
    }

    fn reply(&self, session: &ConnectionSession, event: ServerEvent) {
        self.registry.send_to(session.connection_id, event);
    }

    fn join_room(&self, session: &ConnectionSession, payload: RoomPayload) {
        let Some(room_id) = payload.room_id() else {
            return;
        };

        self.registry
            .join(session.connection_id, ChannelId::room(room_id));
        tracing::debug!(connection_id = %session.connection_id, room_id, "Joined room");

        self.reply(
            session,
            ServerEvent::JoinedRoom(JoinedRoomData {
                room_id: room_id.to_string(),
                user_id: session.identity.id.to_string(),
            }),
        );
    }

    fn typing(&self, session: &ConnectionSession, payload: TypingPayload) {
        let Some(room_id) = payload.room_id() else {
            return;
        };

        let event = ServerEvent::Typing(TypingData {
            room_id: room_id.to_string(),
            user_id: session.identity.id.to_string(),
            name: session.identity.name.clone(),
            is_typing: payload.is_typing(),
        });
        self.registry
            .broadcast_except(&ChannelId::room(room_id), session.connection_id, &event);
    }

    async fn send_message(&self, session: &ConnectionSession, payload: SendMessagePayload) {
        let Some((room_id, text)) = payload.required() else {
            return;
        };

        let cmd = SendChatMessageCommand {
            room_id: room_id.to_string(),
            sender_id: session.identity.id.clone(),
            text: text.to_string(),
        };

        match self.send_chat.handle(cmd).await {
            Ok(message) => {
                let event = ServerEvent::NewMessage(NewMessageData::from_message(
                    &message,
                    &session.identity.name,
                ));
                self.registry.broadcast(&ChannelId::room(room_id), &event);
            }
            Err(err) => {
                match &err {
                    SendChatMessageError::Flagged => tracing::info!(
                        connection_id = %session.connection_id,
                        user_id = %session.identity.id,
                        room_id,
                        "Message rejected by moderation"
                    ),
                    SendChatMessageError::Storage(cause) => tracing::error!(
                        connection_id = %session.connection_id,
                        room_id,
                        error = %cause,
                        "Failed to store chat message"
                    ),
                }
                self.reply(
                    session,
                    ServerEvent::MessageError(MessageErrorData {
                        room_id: room_id.to_string(),
                        message: err.to_string(),
                    }),
                );
            }
        }
    }

    async fn mark_read(&self, session: &ConnectionSession, payload: RoomPayload) {
        let Some(room_id) = payload.room_id() else {
            return;
        };

        let cmd = MarkRoomReadCommand {
            room_id: room_id.to_string(),
            reader: session.identity.id.clone(),
        };

        match self.mark_room_read.handle(cmd).await {
            Ok(_) => {
                let event = ServerEvent::MessagesRead(MessagesReadData {
                    room_id: room_id.to_string(),
                    user_id: session.identity.id.to_string(),
                });
                self.registry.broadcast(&ChannelId::room(room_id), &event);
            }
            Err(err) => {
                tracing::error!(
                    connection_id = %session.connection_id,
                    room_id,
                    error = ?err,
                    "Failed to mark room read"
                );
                self.reply(session, ServerEvent::error(err.to_string()));
            }
        }
    }

    fn join_admin_channel(&self, session: &ConnectionSession, payload: JoinAdminChannelPayload) {
        if !session.identity.is_admin() {
            tracing::warn!(
                connection_id = %session.connection_id,
                user_id = %session.identity.id,
                "Non-admin tried to join an admin channel"
            );
            self.reply(session, ServerEvent::error(ADMIN_ONLY_JOIN));
            return;
        }

        let Some(target) = payload.user_id().and_then(|id| UserId::new(id).ok()) else {
            return;
        };

        let channel = ChannelId::admin_for(&target);
        self.registry.join(session.connection_id, channel.clone());

        self.reply(
            session,
            ServerEvent::JoinedAdminChannel(JoinedAdminChannelData {
                channel_id: channel.to_string(),
                user_id: target.to_string(),
            }),
        );
    }

    fn join_user_notifications(&self, session: &ConnectionSession) {
        let channel = ChannelId::admin_for(&session.identity.id);
        self.registry.join(session.connection_id, channel.clone());
        tracing::debug!(
            connection_id = %session.connection_id,
            channel_id = %channel,
            "Joined own notification channel"
        );

        self.reply(
            session,
            ServerEvent::JoinedUserNotifications(JoinedUserNotificationsData {
                channel_id: channel.to_string(),
            }),
        );
    }

    async fn send_admin_message(
        &self,
        session: &ConnectionSession,
        payload: SendAdminMessagePayload,
    ) {
        if !session.identity.is_admin() {
            tracing::warn!(
                connection_id = %session.connection_id,
                user_id = %session.identity.id,
                "Non-admin tried to send an admin message"
            );
            self.reply(
                session,
                ServerEvent::error(SendAdminMessageError::Forbidden.to_string()),
            );
            return;
        }

        let Some((recipient_id, message)) = payload.required() else {
            return;
        };

        let Ok(recipient_id) = UserId::new(recipient_id) else {
            self.reply(
                session,
                ServerEvent::error(SendAdminMessageError::RecipientNotFound.to_string()),
            );
            return;
        };

        let cmd = SendAdminMessageCommand {
            sender: session.identity.clone(),
            recipient_id,
            title: payload.title.clone(),
            message: message.to_string(),
        };

        match self.send_admin.handle(cmd).await {
            Ok(result) => {
                self.publish_admin_message(&result, &session.identity.name);
                self.reply(
                    session,
                    ServerEvent::AdminMessageSent(AdminMessageSentData {
                        recipient_id: result.recipient.id.to_string(),
                        recipient_email: result.recipient.email.clone(),
                        message_id: result.notification.id.to_string(),
                    }),
                );
            }
            Err(err) => {
                if let SendAdminMessageError::Storage(cause) = &err {
                    tracing::error!(
                        connection_id = %session.connection_id,
                        error = %cause,
                        "Failed to store admin message"
                    );
                }
                self.reply(session, ServerEvent::error(err.to_string()));
            }
        }
    }

    async fn mark_admin_message_read(
        &self,
        session: &ConnectionSession,
        payload: MarkAdminMessageReadPayload,
    ) {
        let Some(raw_id) = payload.message_id() else {
            return;
        };

        let Ok(message_id) = raw_id.parse::<NotificationId>() else {
            self.reply(
                session,
                ServerEvent::error(MarkAdminMessageReadError::NotFound.to_string()),
            );
            return;
        };

        match self
            .mark_admin_read
            .handle(MarkAdminMessageReadCommand { message_id })
            .await
        {
            Ok(_) => {
                let event = ServerEvent::AdminMessageRead(AdminMessageReadData {
                    message_id: raw_id.to_string(),
                });
                self.registry
                    .broadcast(&ChannelId::admin_for(&session.identity.id), &event);
            }
            Err(err) => {
                if let MarkAdminMessageReadError::Storage(cause) = &err {
                    tracing::error!(
                        connection_id = %session.connection_id,
                        error = %cause,
                        "Failed to mark admin message read"
                    );
                }
                self.reply(session, ServerEvent::error(err.to_string()));
            }
        }
    }
}
