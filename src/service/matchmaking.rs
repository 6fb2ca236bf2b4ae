//! Matchmaking engine: the per-connection state machine.
//!
//! [`MatchmakingEngine`] owns the [`ConnectionRegistry`], the
//! [`AvailablePool`] and the [`ActiveSessionTable`]. Every transition takes
//! `&mut self`, so a transition that touches several structures (enqueue then
//! match, unpair then notify, dequeue then pair) always finishes before the
//! next one starts. The engine is driven by a single task, see
//! [`super::engine_actor`].
//!
//! ```text
//!            connect
//!               │
//!               ▼        match
//!           Waiting ───────────────▶ Paired
//!               ▲  ◀─────────────────  │
//!               │   next (self), or    │ next (partner)
//!               │   partner disconnect ▼
//!               └──────── next ────── Idle
//!
//!   disconnect from any state removes the id everywhere.
//! ```

use serde::Serialize;
use utoipa::ToSchema;

use super::relay::{RelayOutcome, SignalRelay};
use crate::domain::{
    ActiveSessionTable, AvailablePool, ChatEndReason, ClientSignal, ConnectionHandle,
    ConnectionId, ConnectionRegistry, ServerEvent,
};

/// Tunables for the engine's teardown policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Put the remaining partner back in the queue when its partner
    /// disconnects. When `false` the partner is left idle until it sends
    /// `next`.
    pub requeue_on_partner_disconnect: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            requeue_on_partner_disconnect: true,
        }
    }
}

/// Where a registered connection currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Queued for a partner.
    Waiting,
    /// In a session with the given partner.
    Paired(ConnectionId),
    /// Registered but neither queued nor paired: its partner skipped it and
    /// it has not asked for a new match yet.
    Idle,
}

/// Point-in-time counters for the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct EngineStats {
    /// Registered connections.
    pub connections: usize,
    /// Connections queued for a partner.
    pub waiting: usize,
    /// Active one-to-one sessions.
    pub paired_sessions: usize,
    /// Connections that are neither waiting nor paired.
    pub idle: usize,
    /// Sessions created since start.
    pub matches_made: u64,
}

/// Pairs connections and drives their lifecycle.
#[derive(Debug, Default)]
pub struct MatchmakingEngine {
    registry: ConnectionRegistry,
    pool: AvailablePool,
    sessions: ActiveSessionTable,
    settings: EngineSettings,
    matches_made: u64,
}

impl MatchmakingEngine {
    /// Creates an engine with no connections.
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Registers a new connection, queues it and tries to match.
    ///
    /// The connection is told its own id before any `matched` event.
    /// Returns `false` and changes nothing if the id is already registered.
    pub fn connect(&mut self, handle: ConnectionHandle) -> bool {
        let id = handle.id();
        if !self.registry.register(handle) {
            tracing::warn!(%id, "duplicate connect ignored");
            return false;
        }
        self.registry.send(id, ServerEvent::Connected { connection_id: id });
        self.pool.enqueue(id);
        tracing::info!(%id, waiting = self.pool.len(), "connection queued");
        self.attempt_match();
        true
    }

    /// Removes `id` from every structure, ending its session if it has one.
    ///
    /// The partner is told `chatEnded` and, depending on
    /// [`EngineSettings::requeue_on_partner_disconnect`], queued again.
    /// Returns `false` when `id` was already fully gone.
    pub fn disconnect(&mut self, id: ConnectionId) -> bool {
        if !self.registry.contains(id) && !self.pool.contains(id) && !self.sessions.is_paired(id)
        {
            tracing::debug!(%id, "disconnect for unknown connection");
            return false;
        }

        let partner = self.end_session(id, ChatEndReason::PartnerDisconnected);
        self.pool.remove(id);
        self.registry.unregister(id);
        tracing::info!(%id, "connection removed");

        if let Some(partner) = partner
            && self.settings.requeue_on_partner_disconnect
            && self.registry.contains(partner)
        {
            self.pool.enqueue(partner);
            tracing::info!(id = %partner, "partner requeued");
            self.attempt_match();
        }
        true
    }

    /// Leaves the current session (if any) and queues `id` for a new match.
    ///
    /// The former partner is told `chatEnded` and left idle. Calling this
    /// while already waiting keeps the queue position. Returns `false` for
    /// an unregistered id, which is never resurrected into the queue.
    pub fn next(&mut self, id: ConnectionId) -> bool {
        if !self.registry.contains(id) {
            tracing::debug!(%id, "next from unregistered connection ignored");
            return false;
        }

        if let Some(partner) = self.end_session(id, ChatEndReason::PartnerLeft) {
            tracing::info!(%id, %partner, "left session");
        }
        self.pool.enqueue(id);
        self.attempt_match();
        true
    }

    /// Forwards a signaling or chat payload to the sender's partner.
    pub fn relay(&self, from: ConnectionId, signal: ClientSignal) -> RelayOutcome {
        SignalRelay::new(&self.sessions, &self.registry).relay(from, signal)
    }

    /// Returns the state of `id`, or `None` when it is not registered.
    #[must_use]
    pub fn state_of(&self, id: ConnectionId) -> Option<ConnectionState> {
        if !self.registry.contains(id) {
            return None;
        }
        if self.pool.contains(id) {
            return Some(ConnectionState::Waiting);
        }
        Some(
            self.sessions
                .lookup(id)
                .map_or(ConnectionState::Idle, ConnectionState::Paired),
        )
    }

    /// Returns current counters.
    #[must_use]
    pub fn stats(&self) -> EngineStats {
        let connections = self.registry.len();
        let waiting = self.pool.len();
        let paired_sessions = self.sessions.session_count();
        EngineStats {
            connections,
            waiting,
            paired_sessions,
            idle: connections
                .saturating_sub(waiting)
                .saturating_sub(paired_sessions.saturating_mul(2)),
            matches_made: self.matches_made,
        }
    }

    /// Read access to the waiting pool.
    #[must_use]
    pub fn pool(&self) -> &AvailablePool {
        &self.pool
    }

    /// Read access to the session table.
    #[must_use]
    pub fn sessions(&self) -> &ActiveSessionTable {
        &self.sessions
    }

    /// Read access to the connection registry.
    #[must_use]
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Pairs waiting connections oldest-first until fewer than two remain.
    fn attempt_match(&mut self) {
        let mut created = 0_usize;
        while let Some((a, b)) = self.pool.dequeue_two() {
            if !self.sessions.pair(a, b) {
                tracing::error!(%a, %b, "dequeued id already paired");
                let free: Vec<_> = [b, a]
                    .into_iter()
                    .filter(|id| !self.sessions.is_paired(*id))
                    .collect();
                // Both free means `pair` cannot succeed for them; stop here.
                let stuck = free.len() == 2;
                for id in free {
                    self.pool.push_front(id);
                }
                if stuck {
                    break;
                }
                continue;
            }
            self.matches_made = self.matches_made.saturating_add(1);
            created = created.saturating_add(1);

            self.registry.send(a, ServerEvent::Matched { partner_id: b });
            self.registry.send(b, ServerEvent::Matched { partner_id: a });
            tracing::info!(%a, %b, "paired");
        }
        if created > 1 {
            tracing::debug!(created, waiting = self.pool.len(), "match pass drained pool");
        }
    }

    /// Dissolves the session of `id` and notifies the partner.
    fn end_session(&mut self, id: ConnectionId, reason: ChatEndReason) -> Option<ConnectionId> {
        let partner = self.sessions.unpair(id)?;
        self.registry.send(partner, ServerEvent::chat_ended(reason));
        tracing::info!(%id, %partner, ?reason, "session ended");
        Some(partner)
    }
}
