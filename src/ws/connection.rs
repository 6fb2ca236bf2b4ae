//! WebSocket connection loop.
//!
//! Bridges one socket to the matchmaking engine: inbound frames become
//! [`crate::service::EngineCommand`]s, and the
//! [`crate::domain::ServerEvent`]s queued on the connection's handle are
//! written back to the socket.

use axum::extract::ws::{Message, WebSocket};
use futures_util::{SinkExt, StreamExt};

use super::messages::{ClientEvent, WsMessage};
use crate::domain::{ConnectionHandle, ConnectionId};
use crate::error::GatewayError;
use crate::service::EngineHandle;

/// Runs the read/write loop for a single WebSocket connection.
///
/// - Registers the connection with the engine under a fresh [`ConnectionId`].
/// - Dispatches client events to the engine.
/// - Forwards engine events to the client.
/// - Tells the engine exactly once that the connection is gone.
pub async fn run_connection(socket: WebSocket, engine: EngineHandle, outbound_capacity: usize) {
    let id = ConnectionId::new();
    let (handle, mut outbound_rx) = ConnectionHandle::channel(id, outbound_capacity);
    if let Err(err) = engine.connect(handle).await {
        tracing::warn!(%id, error = %err, "rejecting ws connection");
        return;
    }
    tracing::info!(%id, "ws client connected");

    let (mut ws_tx, mut ws_rx) = socket.split();

    loop {
        tokio::select! {
            // Incoming frame from client
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match handle_text_message(&text, id, &engine).await {
                            Ok(()) => {}
                            Err(GatewayError::EngineUnavailable) => break,
                            Err(err) => {
                                tracing::debug!(%id, error = %err, "rejected client frame");
                                let frame = WsMessage::error(&err).to_json();
                                if ws_tx.send(Message::text(frame)).await.is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(%id, error = %err, "ws read error");
                        break;
                    }
                    _ => {}
                }
            }
            // Event from the engine
            event = outbound_rx.recv() => {
                let Some(event) = event else { break };
                let frame = WsMessage::event(&event).to_json();
                if ws_tx.send(Message::text(frame)).await.is_err() {
                    break;
                }
            }
        }
    }

    if let Err(err) = engine.disconnect(id).await {
        tracing::warn!(%id, error = %err, "engine gone before disconnect");
    }
    tracing::info!(%id, "ws client disconnected");
}

/// Parses a text frame and hands it to the engine.
async fn handle_text_message(
    text: &str,
    id: ConnectionId,
    engine: &EngineHandle,
) -> Result<(), GatewayError> {
    match ClientEvent::parse(text)?.into_signal() {
        None => engine.next(id).await,
        Some(signal) => engine.signal(id, signal).await,
    }
}
