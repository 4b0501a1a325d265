//! Channel registry for connection-based message routing.
//!
//! Connections join any number of channels (chat rooms and admin
//! channels). Broadcasting to a channel pushes the event into the
//! outbox of every member connection.
//!
//! # Architecture
//!
//! ```text
//! Channel: r1          Channel: admin_f1
//! ├── conn-a           └── conn-f
//! └── conn-b
//!
//! conn-a ──► outbox (bounded mpsc) ──► socket writer task
//! ```
//!
//! Each connection owns one bounded outbox. A slow consumer whose outbox
//! is full loses the event rather than stalling the broadcaster, and a
//! closed outbox is skipped.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};
use uuid::Uuid;

use crate::domain::chat::ChannelId;

use super::messages::ServerEvent;

/// Default outbox size per connection.
pub const DEFAULT_OUTBOX_CAPACITY: usize = 256;

/// Unique identifier for a WebSocket connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
struct RegistryState {
    outboxes: HashMap<ConnectionId, mpsc::Sender<ServerEvent>>,
    members: HashMap<ChannelId, HashSet<ConnectionId>>,
    memberships: HashMap<ConnectionId, HashSet<ChannelId>>,
}

/// Tracks live connections and their channel memberships.
///
/// # Thread Safety
///
/// Uses a synchronous `RwLock`: no operation holds the lock across an
/// await point, and disconnect cleanup has to run from `Drop`.
pub struct ChannelRegistry {
    state: RwLock<RegistryState>,
    outbox_capacity: usize,
}

impl ChannelRegistry {
    /// Create a registry whose connections get outboxes of `outbox_capacity`.
    pub fn new(outbox_capacity: usize) -> Self {
        Self {
            state: RwLock::new(RegistryState::default()),
            outbox_capacity: outbox_capacity.max(1),
        }
    }

    pub fn with_default_capacity() -> Self {
        Self::new(DEFAULT_OUTBOX_CAPACITY)
    }

    /// Register a new connection. The receiver is drained by the socket
    /// writer task.
    pub fn register(&self) -> (ConnectionId, mpsc::Receiver<ServerEvent>) {
        let (tx, rx) = mpsc::channel(self.outbox_capacity);
        let connection_id = ConnectionId::new();
        self.write().outboxes.insert(connection_id, tx);
        (connection_id, rx)
    }

    /// Add a connection to a channel. Joining twice is a no-op.
    ///
    /// Returns `false` when the connection is unknown (already gone).
    pub fn join(&self, connection_id: ConnectionId, channel: ChannelId) -> bool {
        let mut state = self.write();
        if !state.outboxes.contains_key(&connection_id) {
            return false;
        }

        state
            .memberships
            .entry(connection_id)
            .or_default()
            .insert(channel.clone());
        state.members.entry(channel).or_default().insert(connection_id);
        true
    }

    /// Drop a connection and every membership it holds. Empty channels are
    /// removed.
    pub fn remove_connection(&self, connection_id: ConnectionId) {
        let mut state = self.write();
        state.outboxes.remove(&connection_id);

        let channels = state.memberships.remove(&connection_id).unwrap_or_default();
        for channel in channels {
            if let Some(members) = state.members.get_mut(&channel) {
                members.remove(&connection_id);
                if members.is_empty() {
                    state.members.remove(&channel);
                }
            }
        }
    }

    /// Send an event to one connection.
    pub fn send_to(&self, connection_id: ConnectionId, event: ServerEvent) -> bool {
        let state = self.read();
        match state.outboxes.get(&connection_id) {
            Some(outbox) => deliver(connection_id, outbox, event),
            None => false,
        }
    }

    /// Send an event to every member of a channel. Returns how many
    /// outboxes accepted it.
    pub fn broadcast(&self, channel: &ChannelId, event: &ServerEvent) -> usize {
        self.broadcast_filtered(channel, event, None)
    }

    /// Send an event to every member of a channel except `sender`.
    pub fn broadcast_except(
        &self,
        channel: &ChannelId,
        sender: ConnectionId,
        event: &ServerEvent,
    ) -> usize {
        self.broadcast_filtered(channel, event, Some(sender))
    }

    fn broadcast_filtered(
        &self,
        channel: &ChannelId,
        event: &ServerEvent,
        except: Option<ConnectionId>,
    ) -> usize {
        let state = self.read();
        let Some(members) = state.members.get(channel) else {
            return 0;
        };

        members
            .iter()
            .filter(|id| Some(**id) != except)
            .filter_map(|id| state.outboxes.get(id).map(|outbox| (*id, outbox)))
            .filter(|(id, outbox)| deliver(*id, outbox, event.clone()))
            .count()
    }

    /// Number of connections in a channel (0 if the channel doesn't exist).
    pub fn member_count(&self, channel: &ChannelId) -> usize {
        self.read().members.get(channel).map_or(0, HashSet::len)
    }

    /// Channels a connection currently belongs to.
    pub fn channels_of(&self, connection_id: ConnectionId) -> Vec<ChannelId> {
        self.read()
            .memberships
            .get(&connection_id)
            .map(|channels| channels.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Total live connections.
    pub fn connection_count(&self) -> usize {
        self.read().outboxes.len()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}

fn deliver(
    connection_id: ConnectionId,
    outbox: &mpsc::Sender<ServerEvent>,
    event: ServerEvent,
) -> bool {
    match outbox.try_send(event) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            tracing::warn!(%connection_id, "Outbox full, dropping event");
            false
        }
        Err(TrySendError::Closed(_)) => {
            tracing::debug!(%connection_id, "Outbox closed, skipping");
            false
        }
    }
}
