//! WebSocket layer: upgrade handler, connection loop, wire messages.
//!
//! The endpoint at `/ws` is the only way clients join the matchmaking
//! queue. Opening the socket is `connect`; closing it is `disconnect`.

pub mod connection;
pub mod handler;
pub mod messages;
