//! Service layer: matchmaking, signal relay, and the engine actor.
//!
//! [`MatchmakingEngine`] holds all pairing state; [`spawn_engine`] moves it
//! onto its own task and hands out cloneable [`EngineHandle`]s.

pub mod engine_actor;
pub mod matchmaking;
pub mod relay;

pub use engine_actor::{EngineCommand, EngineHandle, spawn_engine};
pub use matchmaking::{ConnectionState, EngineSettings, EngineStats, MatchmakingEngine};
pub use relay::{RelayOutcome, SignalRelay};
