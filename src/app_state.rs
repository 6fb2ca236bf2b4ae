//! Shared application state injected into all Axum handlers.

use crate::service::EngineHandle;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Sender side of the matchmaking engine task.
    pub engine: EngineHandle,
    /// Outbound buffer size for each new WebSocket connection.
    pub outbound_buffer_capacity: usize,
}
