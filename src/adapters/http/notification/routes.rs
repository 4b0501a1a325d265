//! HTTP routes for notification endpoints.

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::adapters::http::middleware::auth_middleware;
use crate::application::handlers::ConnectionAuthenticator;

use super::handlers::{
    list_user_messages, mark_message_read, send_direct_message, NotificationHandlers,
};

/// Creates the notification router. Every route requires a bearer token.
pub fn notification_routes(
    handlers: NotificationHandlers,
    authenticator: ConnectionAuthenticator,
) -> Router {
    Router::new()
        .route("/direct", post(send_direct_message))
        .route("/users/:user_id", get(list_user_messages))
        .route("/:message_id/read", patch(mark_message_read))
        .with_state(handlers)
        .layer(middleware::from_fn_with_state(authenticator, auth_middleware))
}
