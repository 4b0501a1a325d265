//! WebSocket adapters for realtime chat and admin messaging.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    ws_handler (GET /socket)                          │
//! │   - Authenticates the handshake (ConnectionAuthenticator)            │
//! │   - Splits the socket into a writer task and a reader task           │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ ClientEvent
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    RealtimeDispatcher                                │
//! │   - Presence and role checks, moderation                             │
//! │   - Persists through the application handlers                        │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ ServerEvent
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      ChannelRegistry                                 │
//! │   Channel: r1          Channel: r2          Channel: admin_f1        │
//! │   ├── conn-a           ├── conn-c           └── conn-f               │
//! │   └── conn-b           └── conn-d                                    │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire protocol types
//! - [`rooms`] - Channel membership and fan-out
//! - [`dispatcher`] - Per-event semantics
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod dispatcher;
pub mod handler;
pub mod messages;
pub mod rooms;

pub use dispatcher::{ConnectionSession, RealtimeDispatcher};
pub use handler::{close_code, websocket_router, ws_handler, HandshakeQuery, WebSocketState};
pub use messages::{ClientEvent, ProtocolError, ServerEvent};
pub use rooms::{ChannelRegistry, ConnectionId, DEFAULT_OUTBOX_CAPACITY};
