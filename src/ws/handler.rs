//! Axum WebSocket upgrade handler.

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws`: upgrades the connection to a WebSocket and joins the queue.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let engine = state.engine.clone();
    let capacity = state.outbound_buffer_capacity;

    ws.on_upgrade(move |socket| run_connection(socket, engine, capacity))
}
