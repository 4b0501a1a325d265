//! HTTP adapter for admin direct-message endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, MessageListResponse, NotificationEnvelope, NotificationResponse,
    SendDirectMessageRequest,
};
pub use handlers::NotificationHandlers;
pub use routes::notification_routes;
