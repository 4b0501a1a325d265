//! Connection handshake handlers.

mod authenticate_connection;

pub use authenticate_connection::ConnectionAuthenticator;
