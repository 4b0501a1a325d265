//! WebSocket upgrade handler for realtime chat connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Authenticate the handshake token (header first, then `?token=`)
//! 2. Upgrade to WebSocket, or upgrade and close with an auth close code
//! 3. Register the connection with the dispatcher
//! 4. Forward the outbox to the socket and client frames to the dispatcher
//! 5. Drop the session, which removes every channel membership

use std::borrow::Cow;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{CloseFrame, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use futures::{stream::SplitSink, SinkExt, Stream, StreamExt};
use serde::Deserialize;
use tokio::sync::watch;

use crate::adapters::http::middleware::bearer_token;
use crate::application::handlers::ConnectionAuthenticator;
use crate::domain::foundation::{AuthError, Identity};

use super::{
    dispatcher::{ConnectionSession, RealtimeDispatcher},
    messages::{ClientEvent, ServerEvent},
};

/// Close code for an expired token.
pub const CLOSE_TOKEN_EXPIRED: u16 = 4001;
/// Close code for a missing, malformed, or unknown-user token.
pub const CLOSE_UNAUTHORIZED: u16 = 4002;
/// Close code for suspended and parent-locked accounts.
pub const CLOSE_ACCOUNT_LOCKED: u16 = 4003;
/// Standard "internal error" close code, used when identity storage is down.
pub const CLOSE_SERVICE_UNAVAILABLE: u16 = 1011;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub dispatcher: Arc<RealtimeDispatcher>,
    pub authenticator: ConnectionAuthenticator,
}

impl WebSocketState {
    pub fn new(
        dispatcher: Arc<RealtimeDispatcher>,
        authenticator: ConnectionAuthenticator,
    ) -> Self {
        Self {
            dispatcher,
            authenticator,
        }
    }
}

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct HandshakeQuery {
    pub token: Option<String>,
}

/// Router exposing `GET /socket`.
pub fn websocket_router(state: WebSocketState) -> Router {
    Router::new()
        .route("/socket", get(ws_handler))
        .with_state(state)
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /socket`
///
/// Authentication happens before any dispatcher state exists. A refused
/// handshake still completes the upgrade so the client receives a close
/// frame with a machine-readable code and the reason text.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(query): Query<HandshakeQuery>,
    headers: HeaderMap,
    State(state): State<WebSocketState>,
) -> Response {
    let token = bearer_token(&headers).or(query.token.as_deref());

    match state.authenticator.authenticate(token).await {
        Ok(identity) => ws.on_upgrade(move |socket| handle_socket(socket, identity, state)),
        Err(err) => {
            if err.is_transient() {
                tracing::error!(error = %err, "Handshake refused, identity store unavailable");
            } else {
                tracing::warn!(error = %err, "Handshake refused");
            }
            ws.on_upgrade(move |socket| reject_socket(socket, err))
        }
    }
}

/// Close code sent when the handshake fails with `error`.
pub fn close_code(error: &AuthError) -> u16 {
    match error {
        AuthError::TokenExpired => CLOSE_TOKEN_EXPIRED,
        AuthError::MissingToken | AuthError::InvalidToken | AuthError::UserNotFound => {
            CLOSE_UNAUTHORIZED
        }
        AuthError::AccountSuspended | AuthError::ParentControlEnabled => CLOSE_ACCOUNT_LOCKED,
        AuthError::ServiceUnavailable(_) => CLOSE_SERVICE_UNAVAILABLE,
    }
}

async fn reject_socket(mut socket: WebSocket, error: AuthError) {
    let frame = CloseFrame {
        code: close_code(&error),
        reason: Cow::Owned(error.to_string()),
    };
    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("Failed to send close frame: {}", e);
    }
}

/// Handle an established, authenticated WebSocket connection.
///
/// Runs for the lifetime of the connection. Events from one connection are
/// dispatched one at a time, in arrival order.
async fn handle_socket(socket: WebSocket, identity: Identity, state: WebSocketState) {
    let (mut sender, receiver) = socket.split();
    let (session, mut outbox) = state.dispatcher.connect(identity);
    let connection_id = session.connection_id();

    // Forward outbox events to the client
    let mut send_task = tokio::spawn(async move {
        while let Some(event) = outbox.recv().await {
            if let Err(e) = send_event(&mut sender, &event).await {
                tracing::debug!(%connection_id, "Send error, closing connection: {}", e);
                break;
            }
        }
    });

    // Handle incoming frames from the client
    let (stop_tx, stop_rx) = watch::channel(false);
    let mut recv_task = tokio::spawn(receive_frames(
        receiver,
        state.dispatcher.clone(),
        session,
        stop_rx,
    ));

    tokio::select! {
        _ = &mut send_task => {
            // The event being dispatched runs to completion before the session drops
            let _ = stop_tx.send(true);
            if let Err(e) = recv_task.await {
                tracing::error!(%connection_id, "Receive task failed: {}", e);
            }
        }
        _ = &mut recv_task => send_task.abort(),
    }
}

/// Feeds client frames to the dispatcher until the client closes, the
/// stream fails, or `stop` fires.
///
/// `stop` is only observed between frames.
async fn receive_frames<S>(
    mut frames: S,
    dispatcher: Arc<RealtimeDispatcher>,
    session: ConnectionSession,
    mut stop: watch::Receiver<bool>,
) where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let connection_id = session.connection_id();

    loop {
        let result = tokio::select! {
            biased;
            _ = stop.changed() => break,
            frame = frames.next() => match frame {
                Some(result) => result,
                None => break,
            },
        };

        match result {
            Ok(Message::Text(text)) => match ClientEvent::parse(&text) {
                Ok(event) => dispatcher.dispatch(&session, event).await,
                Err(e) => tracing::debug!(%connection_id, "Ignoring frame: {}", e),
            },
            Ok(Message::Binary(_)) => {
                tracing::debug!(%connection_id, "Received unsupported binary message");
            }
            Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                // WebSocket protocol ping/pong - handled automatically by axum
            }
            Ok(Message::Close(_)) => {
                tracing::debug!(%connection_id, "Client sent close frame");
                break;
            }
            Err(e) => {
                tracing::debug!(%connection_id, "Receive error: {}", e);
                break;
            }
        }
    }
    // `session` drops here and leaves every channel
}

/// Send a server event as a JSON text frame.
async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    match event.to_frame() {
        Ok(json) => sender.send(Message::Text(json)).await,
        Err(e) => {
            tracing::error!("Failed to serialize server event: {}", e);
            Ok(())
        }
    }
}
