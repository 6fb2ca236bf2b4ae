//! Live connection handles, keyed by [`ConnectionId`].
//!
//! [`ConnectionRegistry`] is the only component that knows how to reach a
//! client. Everything else addresses connections by id and lets the
//! registry resolve the id to a [`ConnectionHandle`].

use std::collections::HashMap;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::{ConnectionId, ServerEvent};

/// Capability to push [`ServerEvent`]s to one connection.
///
/// Wraps the sending half of a bounded channel whose receiver is drained by
/// the transport task. Delivery never waits: a full or closed channel makes
/// [`ConnectionHandle::deliver`] return `false` and the event is dropped.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    id: ConnectionId,
    sender: mpsc::Sender<ServerEvent>,
}

impl ConnectionHandle {
    /// Creates a handle and the receiver the transport should drain.
    #[must_use]
    pub fn channel(id: ConnectionId, capacity: usize) -> (Self, mpsc::Receiver<ServerEvent>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { id, sender }, receiver)
    }

    /// Returns the connection this handle reaches.
    #[must_use]
    pub const fn id(&self) -> ConnectionId {
        self.id
    }

    /// Fire-and-forget delivery. Returns `true` if the event was queued.
    pub fn deliver(&self, event: ServerEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(event)) => {
                tracing::warn!(
                    id = %self.id,
                    event = event.event_name(),
                    "outbound buffer full, dropping event"
                );
                false
            }
            Err(TrySendError::Closed(event)) => {
                tracing::debug!(
                    id = %self.id,
                    event = event.event_name(),
                    "connection already closed, dropping event"
                );
                false
            }
        }
    }
}

/// Registry of live connections.
///
/// Owned by the matchmaking engine and only mutated from the engine task,
/// so it needs no interior locking.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    handles: HashMap<ConnectionId, ConnectionHandle>,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handle` under its own id.
    ///
    /// Returns `false` and keeps the existing handle if that id is already
    /// registered; ids are never reused for a new connection.
    pub fn register(&mut self, handle: ConnectionHandle) -> bool {
        let id = handle.id();
        if self.handles.contains_key(&id) {
            return false;
        }
        self.handles.insert(id, handle);
        true
    }

    /// Drops the handle for `id`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: ConnectionId) -> bool {
        self.handles.remove(&id).is_some()
    }

    /// Delivers `event` to `id`.
    ///
    /// Sending to an unregistered id is a silent no-op returning `false`:
    /// the target may have disconnected a moment ago.
    pub fn send(&self, id: ConnectionId, event: ServerEvent) -> bool {
        match self.handles.get(&id) {
            Some(handle) => handle.deliver(event),
            None => {
                tracing::debug!(%id, event = event.event_name(), "target not registered");
                false
            }
        }
    }

    /// Returns `true` if `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ConnectionId) -> bool {
        self.handles.contains_key(&id)
    }

    /// Returns the number of registered connections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if no connection is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
