//! HTTP handlers for notification endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::websocket::RealtimeDispatcher;
use crate::application::handlers::{
    ListUserMessagesError, ListUserMessagesHandler, ListUserMessagesQuery,
    MarkAdminMessageReadCommand, MarkAdminMessageReadError, MarkAdminMessageReadHandler,
    SendAdminMessageCommand, SendAdminMessageError, SendAdminMessageHandler,
};
use crate::domain::foundation::{NotificationId, UserId};

use super::dto::{
    ErrorResponse, MessageListResponse, NotificationEnvelope, NotificationResponse,
    SendDirectMessageRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct NotificationHandlers {
    send_handler: Arc<SendAdminMessageHandler>,
    mark_read_handler: Arc<MarkAdminMessageReadHandler>,
    list_handler: Arc<ListUserMessagesHandler>,
    dispatcher: Arc<RealtimeDispatcher>,
}

impl NotificationHandlers {
    pub fn new(
        send_handler: Arc<SendAdminMessageHandler>,
        mark_read_handler: Arc<MarkAdminMessageReadHandler>,
        list_handler: Arc<ListUserMessagesHandler>,
        dispatcher: Arc<RealtimeDispatcher>,
    ) -> Self {
        Self {
            send_handler,
            mark_read_handler,
            list_handler,
            dispatcher,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/notifications/direct - Admin sends a direct message
pub async fn send_direct_message(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(identity): RequireAuth,
    Json(req): Json<SendDirectMessageRequest>,
) -> Response {
    if !identity.is_admin() {
        return forbidden(SendAdminMessageError::Forbidden.to_string());
    }

    let (Some(target), Some(message)) = (req.target_user_id(), req.message()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(
                "Recipient ID and message are required",
            )),
        )
            .into_response();
    };

    let Ok(recipient_id) = UserId::new(target) else {
        return not_found(SendAdminMessageError::RecipientNotFound.to_string());
    };

    let cmd = SendAdminMessageCommand {
        sender: identity.clone(),
        recipient_id,
        title: req.title.clone(),
        message: message.to_string(),
    };

    match handlers.send_handler.handle(cmd).await {
        Ok(result) => {
            handlers
                .dispatcher
                .publish_admin_message(&result, &identity.name);
            let response = NotificationEnvelope {
                message: "Message sent successfully".to_string(),
                notification: NotificationResponse::from(&result.notification),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(SendAdminMessageError::Forbidden) => {
            forbidden(SendAdminMessageError::Forbidden.to_string())
        }
        Err(SendAdminMessageError::RecipientNotFound) => {
            not_found(SendAdminMessageError::RecipientNotFound.to_string())
        }
        Err(SendAdminMessageError::Storage(cause)) => internal_error(&cause),
    }
}

/// GET /api/notifications/users/:user_id - List a user's admin messages
pub async fn list_user_messages(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(identity): RequireAuth,
    Path(user_id): Path<String>,
) -> Response {
    let Ok(user_id) = UserId::new(user_id) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request("Invalid user ID")),
        )
            .into_response();
    };

    let query = ListUserMessagesQuery {
        requester: identity,
        user_id,
    };

    match handlers.list_handler.handle(query).await {
        Ok(notifications) => {
            (StatusCode::OK, Json(MessageListResponse::new(&notifications))).into_response()
        }
        Err(e @ ListUserMessagesError::Forbidden) => forbidden(e.to_string()),
        Err(ListUserMessagesError::Storage(cause)) => internal_error(&cause),
    }
}

/// PATCH /api/notifications/:message_id/read - Mark a message read
pub async fn mark_message_read(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(_identity): RequireAuth,
    Path(message_id): Path<String>,
) -> Response {
    let Ok(message_id) = message_id.parse::<NotificationId>() else {
        return not_found(MarkAdminMessageReadError::NotFound.to_string());
    };

    match handlers
        .mark_read_handler
        .handle(MarkAdminMessageReadCommand { message_id })
        .await
    {
        Ok(notification) => {
            let response = NotificationEnvelope {
                message: "Message marked as read".to_string(),
                notification: NotificationResponse::from(&notification),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e @ MarkAdminMessageReadError::NotFound) => not_found(e.to_string()),
        Err(MarkAdminMessageReadError::Storage(cause)) => internal_error(&cause),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

fn forbidden(message: String) -> Response {
    (StatusCode::FORBIDDEN, Json(ErrorResponse::forbidden(message))).into_response()
}

fn not_found(message: String) -> Response {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::not_found(message))).into_response()
}

fn internal_error(cause: &str) -> Response {
    tracing::error!(error = %cause, "Notification request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::internal("Server error")),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_error_hides_cause() {
        let response = internal_error("connection refused (db-1:5432)");
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn not_found_maps_to_404() {
        assert_eq!(not_found("Message not found".into()).status(), StatusCode::NOT_FOUND);
    }
}
