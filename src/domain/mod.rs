//! Domain layer: connection identity, the waiting pool, the session table,
//! and the registry of live connection handles.
//!
//! Every type here is a plain single-owner structure. The matchmaking
//! engine owns one of each and serializes access to them.

pub mod available_pool;
pub mod client_signal;
pub mod connection_id;
pub mod connection_registry;
pub mod server_event;
pub mod session_table;

pub use available_pool::AvailablePool;
pub use client_signal::ClientSignal;
pub use connection_id::ConnectionId;
pub use connection_registry::{ConnectionHandle, ConnectionRegistry};
pub use server_event::{ChatEndReason, ServerEvent};
pub use session_table::ActiveSessionTable;
