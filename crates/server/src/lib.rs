//! Authoritative match server for the duel game.
//!
//! Clients connect over TCP and exchange newline-delimited JSON messages.
//! A single orchestrator worker owns the matchmaking queue and every match,
//! and changes match state only through [`duel_core::apply_action`].
pub mod config;
pub mod errors;
pub mod handle;
pub mod orchestrator;
pub mod protocol;
pub mod server;
pub mod transport;
pub mod worker;

pub use config::{MatchSettings, ServerConfig};
pub use errors::{RequestError, Result, ServerError};
pub use handle::ServerHandle;
pub use orchestrator::{
    ClientId, ClientStatus, ClockSeed, FixedSeed, MatchSession, Orchestrator, OrchestratorStats,
    SeedSource, TimerEvent, TimerRequest,
};
pub use protocol::{ClientMessage, OpponentInfo, ProtocolError, ServerMessage};
pub use server::{DuelServer, DuelServerBuilder};
pub use transport::serve;
