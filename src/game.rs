//! Aggregating game state
//!
//! [`Game`] owns the board, the live ball set, the ledger, and the request
//! queue. [`Game::tick`] is the single entry point that advances simulation
//! time; every externally-triggered mutation (spawns, commands, reset) is
//! queued and drained at the start of a tick, which keeps the integration
//! phase single-threaded and lock-free and gives a clean ordering rule:
//! requests queued before a tick begins are visible to that tick, requests
//! arriving during it wait for the next one.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::commands::{self, EffectRequest};
use crate::config::{ConfigError, DropPolicy, GameConfig};
use crate::events::{GameHandle, LiveEvent, Request, RequestQueue, spawn_count};
use crate::score::{LeaderboardEntry, Ledger};
use crate::sim::{self, Ball, Board, ScoreEvent, SpawnRequest};

/// What one tick produced, for the rendering and audio collaborators.
#[derive(Debug, Default)]
pub struct TickOutput {
    /// Balls that landed this tick.
    pub scores: Vec<ScoreEvent>,
    /// Ledger-approved command effects emitted this tick.
    pub effects: Vec<EffectRequest>,
    /// Pegs struck this tick (indices into [`Game::board`]'s peg list).
    pub peg_hits: Vec<usize>,
}

/// The complete game: simulation, scoring, and economy under one owner.
pub struct Game {
    cfg: GameConfig,
    board: Board,
    balls: Vec<Ball>,
    ledger: Ledger,
    leaderboard: Vec<LeaderboardEntry>,
    queue: Arc<RequestQueue>,
    rng: Pcg32,
    next_ball_id: u32,
    ticks: u64,
}

impl Game {
    /// Build the game from a configuration. Fails only on an invalid
    /// configuration, the one error that must stop startup.
    pub fn new(cfg: GameConfig) -> Result<Self, ConfigError> {
        let board = Board::new(&cfg)?;
        let rng = Pcg32::seed_from_u64(cfg.seed);
        Ok(Self {
            board,
            balls: Vec::new(),
            ledger: Ledger::new(),
            leaderboard: Vec::new(),
            queue: Arc::new(RequestQueue::default()),
            rng,
            next_ball_id: 1,
            ticks: 0,
            cfg,
        })
    }

    /// Cloneable handle for event-producing threads. Safe to use while a
    /// tick is in progress.
    pub fn handle(&self) -> GameHandle {
        GameHandle::new(Arc::clone(&self.queue))
    }

    /// Enqueue a spawn request. Never blocks, never fails; applied at the
    /// next tick, subject to the live-ball cap.
    pub fn spawn(&self, request: SpawnRequest) {
        self.queue.push(Request::Spawn(request));
    }

    /// Enqueue an engagement event for the spawn/command pipeline.
    pub fn submit_event(&self, event: LiveEvent) {
        self.queue.push(Request::Event(event));
    }

    /// Enqueue a command on a user's behalf.
    pub fn submit_command(&self, user: &str, text: &str) {
        self.queue.push(Request::Command {
            user: user.to_owned(),
            text: text.to_owned(),
            avatar: None,
        });
    }

    /// Enqueue a full reset: all balls and all balances.
    pub fn reset(&self) {
        self.queue.push(Request::Reset);
    }

    /// Advance the simulation by one fixed step.
    ///
    /// Drains the request queue, integrates and scores, credits the ledger,
    /// and refreshes the leaderboard snapshot. Must be called at a fixed,
    /// regular cadence by the driving loop.
    pub fn tick(&mut self, dt: f32) -> TickOutput {
        let mut output = TickOutput::default();
        for request in self.queue.drain() {
            self.apply(request, &mut output);
        }

        let events = sim::step(&mut self.balls, &self.board, &self.cfg, dt, &mut self.rng);
        for score in &events.scores {
            if let Some(user) = &score.user {
                self.ledger.credit(user, score.amount);
                log::info!("{user} landed in slot {} for {}", score.slot, score.amount);
            }
        }
        output.scores = events.scores;
        output.peg_hits = events.peg_hits;

        self.leaderboard = self.ledger.top(self.cfg.leaderboard_depth);
        self.ticks += 1;
        output
    }

    /// Live balls, in spawn order.
    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    /// The leaderboard snapshot from the most recent tick.
    pub fn leaderboard(&self) -> &[LeaderboardEntry] {
        &self.leaderboard
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    /// Ticks elapsed since construction or the last reset.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn apply(&mut self, request: Request, output: &mut TickOutput) {
        match request {
            Request::Event(event) => self.apply_event(event, output),
            Request::Spawn(request) => self.spawn_now(request),
            Request::Command { user, text, avatar } => {
                self.command_now(&user, &text, avatar, output);
            }
            Request::Reset => self.reset_now(),
        }
    }

    fn apply_event(&mut self, event: LiveEvent, output: &mut TickOutput) {
        // Comments may carry a command; those route to the economy and only
        // spawn balls when configured to do both.
        if let LiveEvent::Comment { user, text, avatar } = &event {
            if let Some(req) = commands::parse(user, text, avatar.clone(), &self.cfg) {
                if let Some(effect) = commands::execute(req, &mut self.ledger, &self.cfg) {
                    output.effects.push(effect);
                }
                if !self.cfg.commands_also_spawn {
                    return;
                }
            }
        }
        let request = SpawnRequest::for_user(event.user(), spawn_count(&event, &self.cfg))
            .with_avatar(event.avatar().map(str::to_owned));
        self.spawn_now(request);
    }

    fn command_now(
        &mut self,
        user: &str,
        text: &str,
        avatar: Option<String>,
        output: &mut TickOutput,
    ) {
        if let Some(req) = commands::parse(user, text, avatar, &self.cfg) {
            if let Some(effect) = commands::execute(req, &mut self.ledger, &self.cfg) {
                output.effects.push(effect);
            }
        }
    }

    fn spawn_now(&mut self, request: SpawnRequest) {
        let requested = request.count as usize;
        let allowed = match self.cfg.drop_policy {
            DropPolicy::DropNewest => {
                requested.min(self.cfg.max_balls.saturating_sub(self.balls.len()))
            }
            DropPolicy::DropOldest => {
                let overflow =
                    (self.balls.len() + requested).saturating_sub(self.cfg.max_balls);
                if overflow > 0 {
                    self.balls.drain(..overflow.min(self.balls.len()));
                }
                requested.min(self.cfg.max_balls)
            }
        };
        if allowed < requested {
            log::debug!(
                "ball cap {} reached: dropping {} of {} spawns",
                self.cfg.max_balls,
                requested - allowed,
                requested
            );
        }
        for _ in 0..allowed {
            let id = self.next_ball_id;
            self.next_ball_id = self.next_ball_id.wrapping_add(1);
            self.balls
                .push(Ball::spawn(id, &request, &self.cfg, &mut self.rng));
        }
    }

    fn reset_now(&mut self) {
        log::info!(
            "reset: clearing {} balls and {} users",
            self.balls.len(),
            self.ledger.len()
        );
        self.balls.clear();
        self.ledger.reset();
        self.leaderboard.clear();
        self.ticks = 0;
    }
}
