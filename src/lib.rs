//! Plinko Live - an audience-driven Plinko board
//!
//! Core modules:
//! - `sim`: Deterministic simulation (board geometry, physics, slot scoring)
//! - `score`: Per-user point ledger and ranked leaderboard
//! - `commands`: Point-gated command economy
//! - `events`: Engagement events, spawn mapping, and the tick-drained queue
//! - `game`: Aggregating game state and the per-tick update entry point
//!
//! The crate is a library. Rendering, audio, avatar fetching, and the real
//! live-stream ingestion client are external collaborators: they push
//! [`events::LiveEvent`] values through a [`events::GameHandle`] and consume
//! the outputs of each [`game::Game::tick`] call.

pub mod commands;
pub mod config;
pub mod events;
pub mod game;
pub mod score;
pub mod sim;

pub use commands::{CommandRequest, EffectRequest};
pub use config::{ConfigError, DropPolicy, GameConfig};
pub use events::{EventSource, GameHandle, LiveEvent, SyntheticSource};
pub use game::{Game, TickOutput};
pub use score::{LeaderboardEntry, Ledger, LedgerError};
pub use sim::{Ball, Board, ScoreEvent, SpawnRequest};

/// Numeric guards for the simulation code.
///
/// Gameplay tunables live in [`config::GameConfig`]; nothing here is meant
/// to be adjusted per deployment.
pub mod consts {
    /// Below this ball/peg center distance there is no usable collision
    /// normal; the overlap is skipped and the next tick resolves it.
    pub const MIN_COLLISION_DIST: f32 = 1e-4;
    /// Maximum catch-up steps per frame to prevent spiral of death when the
    /// driving loop falls behind.
    pub const MAX_SUBSTEPS: u32 = 8;
}
