//! # roulette-gateway
//!
//! WebSocket gateway that pairs anonymous clients into one-to-one sessions
//! and relays WebRTC signaling and chat between the two partners.
//!
//! All pairing state lives in memory inside a single
//! [`service::MatchmakingEngine`], driven by one task. Signaling payloads
//! (SDP, ICE candidates) and chat messages are forwarded without being
//! inspected.
//!
//! ## Architecture
//!
//! ```text
//! Clients (WebSocket /ws, HTTP)
//!     │
//!     ├── WS Handler (ws/)          ├── HTTP Handlers (api/)
//!     │                             │
//!     └──────── EngineHandle (service/engine_actor) ──┘
//!                     │  mpsc, one command at a time
//!                     ▼
//!             MatchmakingEngine (service/)
//!                     │
//!     ├── ConnectionRegistry (domain/)
//!     ├── AvailablePool (domain/)
//!     ├── ActiveSessionTable (domain/)
//!     └── SignalRelay (service/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod ws;
