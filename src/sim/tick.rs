//! Fixed timestep simulation step
//!
//! Advances every live ball by `dt` (semi-implicit integration, wall and
//! peg resolution), then runs the slot-scoring scan. Deterministic given
//! the RNG state.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::sim::board::Board;
use crate::sim::collision::{clamp_to_walls, resolve_peg_collisions};
use crate::sim::state::Ball;

/// A ball arriving in a slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreEvent {
    /// Credited user; `None` for anonymous balls (no ledger mutation).
    pub user: Option<String>,
    /// Slot index, left to right.
    pub slot: usize,
    /// Slot value times the ball's multiplier.
    pub amount: u64,
    /// Landing position, for the renderer and audio collaborators.
    pub pos: Vec2,
}

/// Everything one step produced.
#[derive(Debug, Default)]
pub struct StepEvents {
    pub scores: Vec<ScoreEvent>,
    /// Board indices of pegs struck this step (peg flash, impact audio).
    pub peg_hits: Vec<usize>,
}

/// Advance all balls by one fixed step and score the arrivals.
///
/// A ball whose bottom edge reaches the scoring line is scored and removed
/// from the live set within the same step; it is never integrated again
/// and never scored twice.
pub fn step(
    balls: &mut Vec<Ball>,
    board: &Board,
    cfg: &GameConfig,
    dt: f32,
    rng: &mut Pcg32,
) -> StepEvents {
    let mut events = StepEvents::default();

    let mut survivors = Vec::with_capacity(balls.len());
    for mut ball in balls.drain(..) {
        // Semi-implicit: gravity into velocity first keeps energy bounded
        // and avoids tunneling at this step size.
        ball.vel.y += cfg.gravity * dt;
        ball.pos += ball.vel * dt;

        clamp_to_walls(
            &mut ball,
            board.wall_left,
            board.wall_right,
            cfg.wall_restitution,
        );
        events
            .peg_hits
            .extend(resolve_peg_collisions(&mut ball, &board.pegs, cfg, rng));

        if ball.pos.y + ball.radius >= board.bottom {
            let slot = board.slot_at(ball.pos.x);
            events.scores.push(ScoreEvent {
                user: ball.owner,
                slot: slot.index,
                amount: slot.value * ball.multiplier,
                pos: ball.pos,
            });
        } else {
            survivors.push(ball);
        }
    }
    *balls = survivors;
    events
}
