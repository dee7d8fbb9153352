//! Ball entities and spawn requests
//!
//! Balls are owned exclusively by the game state's live set: created from a
//! spawn request, mutated by the integrator each tick, removed the moment
//! slot scoring claims them.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A request to drop balls for a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRequest {
    /// Scoring user; `None` for system/demo balls that credit nobody.
    pub user: Option<String>,
    /// How many balls to drop.
    pub count: u32,
    /// Opaque avatar reference carried through to the renderer.
    pub avatar: Option<String>,
    /// Event-derived score multiplier applied when the ball lands.
    pub multiplier: u64,
}

impl SpawnRequest {
    pub fn for_user(user: impl Into<String>, count: u32) -> Self {
        Self {
            user: Some(user.into()),
            count,
            avatar: None,
            multiplier: 1,
        }
    }

    /// An ownerless ball; lands without crediting the ledger.
    pub fn anonymous(count: u32) -> Self {
        Self {
            user: None,
            count,
            avatar: None,
            multiplier: 1,
        }
    }

    pub fn with_avatar(mut self, avatar: Option<String>) -> Self {
        self.avatar = avatar;
        self
    }
}

/// A live ball.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// User the eventual score credits; `None` for anonymous balls.
    pub owner: Option<String>,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Slot value is multiplied by this when the ball lands.
    pub multiplier: u64,
    /// Opaque cosmetic tag, passed through for rendering only.
    pub avatar: Option<String>,
}

impl Ball {
    /// Create one ball of a spawn request, randomized inside the spawn band
    /// above the first peg row. Position jitter keeps same-event balls from
    /// stacking into identical trajectories.
    pub fn spawn(id: u32, req: &SpawnRequest, cfg: &GameConfig, rng: &mut Pcg32) -> Self {
        let center = cfg.width / 2.0;
        let x = center + rng.random_range(-cfg.spawn_band..=cfg.spawn_band);
        let y = cfg.top_margin - 2.0 * cfg.ball_radius;
        let vx = rng.random_range(-cfg.spawn_jitter..=cfg.spawn_jitter);
        Self {
            id,
            owner: req.user.clone(),
            pos: Vec2::new(x, y),
            vel: Vec2::new(vx, 0.0),
            radius: cfg.ball_radius,
            multiplier: req.multiplier,
            avatar: req.avatar.clone(),
        }
    }
}
