//! Deterministic simulation module
//!
//! Board geometry, ball entities, collision resolution, and the fixed-step
//! update. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (balls kept in spawn order)
//! - No I/O, no ledger access, no platform dependencies

pub mod board;
pub mod collision;
pub mod state;
pub mod tick;

pub use board::{Board, Peg, Slot};
pub use collision::{Contact, clamp_to_walls, peg_contact, reflect, resolve_peg_collisions};
pub use state::{Ball, SpawnRequest};
pub use tick::{ScoreEvent, StepEvents, step};
