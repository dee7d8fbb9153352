//! Game configuration
//!
//! One immutable value, constructed (and validated) at startup and passed by
//! reference into every component. No ambient globals: a component that needs
//! a tunable takes `&GameConfig`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected configuration. Fatal at startup: the board must never be built
/// from geometrically inconsistent parameters.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    #[error("{0} must be at least 1")]
    ZeroCount(&'static str),
    #[error("{name} must be strictly between 0 and 1, got {value}")]
    Restitution { name: &'static str, value: f32 },
    #[error("slot_values must not be empty")]
    NoSlots,
    #[error("top and bottom margins leave no room for the peg field")]
    MarginOverflow,
    #[error("peg rows do not fit the board width: spacing {spacing:.1} <= peg diameter {diameter:.1}")]
    PegOverflow { spacing: f32, diameter: f32 },
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// What to do with a spawn request that would push the live-ball count over
/// [`GameConfig::max_balls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DropPolicy {
    /// Discard the excess of the incoming request; live balls are untouched.
    #[default]
    DropNewest,
    /// Remove the oldest live balls to make room for the new ones.
    DropOldest,
}

/// All gameplay tunables.
///
/// Defaults reproduce the classic 8-row, 9-slot board. Deserializes from
/// JSON with per-field fallback so a deployment only overrides what it needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Board ===
    /// Board width in world units; walls sit at x = 0 and x = width.
    pub width: f32,
    /// Board height; balls score when they reach `height - bottom_margin`.
    pub height: f32,
    /// Space above the first peg row (spawn band lives here).
    pub top_margin: f32,
    /// Space reserved below the last peg row for the slots.
    pub bottom_margin: f32,
    /// Number of peg rows.
    pub rows: u32,
    /// Pegs in the first row; each following row has one more.
    pub top_pegs: u32,
    pub peg_radius: f32,
    pub ball_radius: f32,
    /// Score value per slot, left to right. The slot count is this length.
    pub slot_values: Vec<u64>,

    // === Physics ===
    /// Downward acceleration in units/s^2.
    pub gravity: f32,
    /// Velocity fraction kept after a peg bounce.
    pub restitution: f32,
    /// Velocity fraction kept after a wall bounce.
    pub wall_restitution: f32,
    /// Fixed simulation timestep in seconds.
    pub dt: f32,
    /// Maximum random horizontal kick (units/s) added after a peg bounce.
    /// Breaks up identical trajectories; must stay small next to `gravity`.
    pub perturbation: f32,

    // === Spawning ===
    pub balls_per_comment: u32,
    pub balls_per_like: u32,
    pub balls_per_follow: u32,
    pub balls_per_share: u32,
    /// Donation spawn count is `donation_base + bonus`, where `bonus` is
    /// `floor(amount * donation_per_amount)` capped at `donation_bonus_cap`.
    pub donation_base: u32,
    pub donation_per_amount: f32,
    pub donation_bonus_cap: u32,
    /// Whether a comment recognized as a command also spawns its balls.
    pub commands_also_spawn: bool,
    /// Live-ball cap; excess spawns are handled per `drop_policy`.
    pub max_balls: usize,
    pub drop_policy: DropPolicy,
    /// Horizontal half-width of the randomized spawn area around board center.
    pub spawn_band: f32,
    /// Maximum initial horizontal speed (units/s) given to a spawned ball.
    pub spawn_jitter: f32,

    // === Economy ===
    /// Point cost per command name. A name absent here is not a command.
    pub command_costs: HashMap<String, u64>,
    /// Command arguments are truncated to this many characters.
    pub max_command_arg_len: usize,

    // === Leaderboard ===
    /// How many entries each per-tick leaderboard snapshot holds.
    pub leaderboard_depth: usize,

    // === Determinism ===
    /// Seed for the simulation RNG (spawn jitter, bounce perturbation).
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 800.0,
            top_margin: 200.0,
            bottom_margin: 10.0,
            rows: 8,
            top_pegs: 3,
            peg_radius: 6.0,
            ball_radius: 20.0,
            slot_values: vec![100, 50, 25, 10, 5, 10, 25, 50, 100],

            gravity: 2000.0,
            restitution: 0.55,
            wall_restitution: 0.7,
            dt: 1.0 / 60.0,
            perturbation: 60.0,

            balls_per_comment: 1,
            balls_per_like: 1,
            balls_per_follow: 2,
            balls_per_share: 3,
            donation_base: 5,
            donation_per_amount: 0.1,
            donation_bonus_cap: 10,
            commands_also_spawn: false,
            max_balls: 256,
            drop_policy: DropPolicy::DropNewest,
            spawn_band: 40.0,
            spawn_jitter: 40.0,

            command_costs: HashMap::from([(String::from("msg"), 25)]),
            max_command_arg_len: 50,

            leaderboard_depth: 10,

            seed: 0,
        }
    }
}

impl GameConfig {
    /// Parse from JSON, falling back to defaults for absent fields, then
    /// validate.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check geometric and numeric consistency. Called by
    /// [`crate::game::Game::new`]; a failure here must abort startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("peg_radius", self.peg_radius),
            ("ball_radius", self.ball_radius),
            ("gravity", self.gravity),
            ("dt", self.dt),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive(name));
            }
        }
        for (name, value) in [("rows", self.rows), ("top_pegs", self.top_pegs)] {
            if value == 0 {
                return Err(ConfigError::ZeroCount(name));
            }
        }
        if self.max_balls == 0 {
            return Err(ConfigError::ZeroCount("max_balls"));
        }
        if self.leaderboard_depth == 0 {
            return Err(ConfigError::ZeroCount("leaderboard_depth"));
        }
        for (name, value) in [
            ("restitution", self.restitution),
            ("wall_restitution", self.wall_restitution),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::Restitution { name, value });
            }
        }
        if self.slot_values.is_empty() {
            return Err(ConfigError::NoSlots);
        }
        if self.top_margin + self.bottom_margin >= self.height {
            return Err(ConfigError::MarginOverflow);
        }
        let spacing = self.peg_spacing();
        let diameter = self.peg_radius * 2.0;
        if spacing <= diameter {
            return Err(ConfigError::PegOverflow { spacing, diameter });
        }
        Ok(())
    }

    /// Pegs in the widest (last) row.
    pub fn max_pegs_in_row(&self) -> u32 {
        self.top_pegs + self.rows - 1
    }

    /// Horizontal distance between adjacent pegs in a row.
    pub fn peg_spacing(&self) -> f32 {
        self.width / (self.max_pegs_in_row() + 1) as f32
    }

    /// Largest spawn count a single donation can produce.
    pub fn max_donation_spawn(&self) -> u32 {
        self.donation_base + self.donation_bonus_cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        GameConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_zero_rows() {
        let cfg = GameConfig {
            rows: 0,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::ZeroCount("rows"))));
    }

    #[test]
    fn rejects_out_of_range_restitution() {
        let cfg = GameConfig {
            restitution: 1.0,
            ..GameConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::Restitution { .. })
        ));
    }

    #[test]
    fn rejects_peg_field_wider_than_board() {
        // 50 pegs of radius 6 cannot fit a 600-wide board.
        let cfg = GameConfig {
            top_pegs: 43,
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::PegOverflow { .. })));
    }

    #[test]
    fn rejects_empty_slots() {
        let cfg = GameConfig {
            slot_values: Vec::new(),
            ..GameConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::NoSlots)));
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let cfg = GameConfig::from_json(r#"{"rows": 10, "seed": 42}"#).unwrap();
        assert_eq!(cfg.rows, 10);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.width, 600.0);
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        assert!(matches!(
            GameConfig::from_json("{"),
            Err(ConfigError::Parse(_))
        ));
    }
}
