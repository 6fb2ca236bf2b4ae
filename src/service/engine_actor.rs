//! Single-task actor that owns the [`MatchmakingEngine`].
//!
//! WebSocket tasks never touch the engine directly. They send
//! [`EngineCommand`]s through an [`EngineHandle`]; the actor applies them
//! one at a time, so a connect racing a disconnect can never observe (or
//! produce) a half-finished transition.

use tokio::sync::{mpsc, oneshot};

use super::matchmaking::{ConnectionState, EngineStats, MatchmakingEngine};
use crate::domain::{ClientSignal, ConnectionHandle, ConnectionId};
use crate::error::GatewayError;

/// A unit of work for the engine task.
#[derive(Debug)]
pub enum EngineCommand {
    /// A connection was opened.
    Connect {
        /// Delivery handle for the new connection.
        handle: ConnectionHandle,
    },
    /// A connection was closed.
    Disconnect {
        /// Connection that closed.
        id: ConnectionId,
    },
    /// A connection asked for a new partner.
    Next {
        /// Requesting connection.
        id: ConnectionId,
    },
    /// A payload to forward to the sender's partner.
    Signal {
        /// Sending connection.
        from: ConnectionId,
        /// Opaque payload.
        signal: ClientSignal,
    },
    /// Snapshot the engine counters.
    Stats {
        /// Reply channel.
        reply: oneshot::Sender<EngineStats>,
    },
    /// Look up the state of one connection.
    State {
        /// Connection to inspect.
        id: ConnectionId,
        /// Reply channel.
        reply: oneshot::Sender<Option<ConnectionState>>,
    },
}

/// Cloneable sender side of the engine task.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    sender: mpsc::Sender<EngineCommand>,
}

/// Spawns the engine task on the current Tokio runtime.
///
/// `capacity` bounds the command queue; producers wait for a slot when it is
/// full. The task exits once every [`EngineHandle`] has been dropped.
#[must_use]
pub fn spawn_engine(engine: MatchmakingEngine, capacity: usize) -> EngineHandle {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    tokio::spawn(run_engine(engine, receiver));
    EngineHandle { sender }
}

async fn run_engine(mut engine: MatchmakingEngine, mut commands: mpsc::Receiver<EngineCommand>) {
    tracing::info!("matchmaking engine started");
    while let Some(command) = commands.recv().await {
        apply(&mut engine, command);
    }
    tracing::info!(stats = ?engine.stats(), "matchmaking engine stopped");
}

fn apply(engine: &mut MatchmakingEngine, command: EngineCommand) {
    match command {
        EngineCommand::Connect { handle } => {
            engine.connect(handle);
        }
        EngineCommand::Disconnect { id } => {
            engine.disconnect(id);
        }
        EngineCommand::Next { id } => {
            engine.next(id);
        }
        EngineCommand::Signal { from, signal } => {
            let event = signal.event_name();
            let outcome = engine.relay(from, signal);
            tracing::trace!(%from, event, ?outcome, "relayed");
        }
        EngineCommand::Stats { reply } => {
            let _ = reply.send(engine.stats());
        }
        EngineCommand::State { id, reply } => {
            let _ = reply.send(engine.state_of(id));
        }
    }
}

impl EngineHandle {
    /// Registers a new connection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EngineUnavailable`] if the engine task has
    /// stopped.
    pub async fn connect(&self, handle: ConnectionHandle) -> Result<(), GatewayError> {
        self.send(EngineCommand::Connect { handle }).await
    }

    /// Tears down a closed connection.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EngineUnavailable`] if the engine task has
    /// stopped.
    pub async fn disconnect(&self, id: ConnectionId) -> Result<(), GatewayError> {
        self.send(EngineCommand::Disconnect { id }).await
    }

    /// Skips to the next partner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EngineUnavailable`] if the engine task has
    /// stopped.
    pub async fn next(&self, id: ConnectionId) -> Result<(), GatewayError> {
        self.send(EngineCommand::Next { id }).await
    }

    /// Relays a payload to the sender's partner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EngineUnavailable`] if the engine task has
    /// stopped.
    pub async fn signal(&self, from: ConnectionId, signal: ClientSignal) -> Result<(), GatewayError> {
        self.send(EngineCommand::Signal { from, signal }).await
    }

    /// Returns engine counters, observed after every command sent earlier
    /// through this handle.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EngineUnavailable`] if the engine task has
    /// stopped.
    pub async fn stats(&self) -> Result<EngineStats, GatewayError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::Stats { reply }).await?;
        rx.await.map_err(|_| GatewayError::EngineUnavailable)
    }

    /// Returns the state of `id`, or `None` when it is not registered.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::EngineUnavailable`] if the engine task has
    /// stopped.
    pub async fn state_of(&self, id: ConnectionId) -> Result<Option<ConnectionState>, GatewayError> {
        let (reply, rx) = oneshot::channel();
        self.send(EngineCommand::State { id, reply }).await?;
        rx.await.map_err(|_| GatewayError::EngineUnavailable)
    }

    async fn send(&self, command: EngineCommand) -> Result<(), GatewayError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| GatewayError::EngineUnavailable)
    }
}
