//! HTTP adapters - REST API implementations.
//!
//! - `middleware` - Bearer authentication shared with the socket handshake
//! - `notification` - Admin direct-message endpoints
//! - `router` - Health probe and route assembly

pub mod middleware;
pub mod notification;
pub mod router;

pub use notification::{notification_routes, NotificationHandlers};
pub use router::{app_router, health};
