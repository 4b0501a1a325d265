//! Top-level application router.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::application::handlers::ConnectionAuthenticator;

use super::notification::{notification_routes, NotificationHandlers};

/// GET / - Liveness probe
pub async fn health() -> Json<Value> {
    Json(json!({ "message": "EduConnect API is running" }))
}

/// Assembles every route. Cross-cutting layers (tracing, CORS) are added
/// by the binary.
pub fn app_router(
    websocket: WebSocketState,
    notifications: NotificationHandlers,
    authenticator: ConnectionAuthenticator,
) -> Router {
    Router::new()
        .route("/", get(health))
        .merge(websocket_router(websocket))
        .nest(
            "/api/notifications",
            notification_routes(notifications, authenticator),
        )
}
