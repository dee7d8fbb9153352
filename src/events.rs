//! Engagement events and the spawn pipeline
//!
//! External collaborators (the live-stream ingestion client, or the
//! synthetic generator below) produce discrete engagement notifications.
//! They never call into the simulation directly: every notification goes
//! through a [`GameHandle`] onto a queue the game drains at the start of
//! each tick. All requests queued before a tick begins are visible to that
//! tick; none queued during it are.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::sim::SpawnRequest;

/// A discrete engagement notification.
///
/// Avatar references are opaque (a URL or id) and passed through; the core
/// never fetches them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiveEvent {
    Comment {
        user: String,
        text: String,
        avatar: Option<String>,
    },
    Like {
        user: String,
        avatar: Option<String>,
    },
    Follow {
        user: String,
        avatar: Option<String>,
    },
    Share {
        user: String,
        avatar: Option<String>,
    },
    Donation {
        user: String,
        amount: f64,
        avatar: Option<String>,
    },
}

impl LiveEvent {
    pub fn user(&self) -> &str {
        match self {
            Self::Comment { user, .. }
            | Self::Like { user, .. }
            | Self::Follow { user, .. }
            | Self::Share { user, .. }
            | Self::Donation { user, .. } => user,
        }
    }

    pub fn avatar(&self) -> Option<&str> {
        match self {
            Self::Comment { avatar, .. }
            | Self::Like { avatar, .. }
            | Self::Follow { avatar, .. }
            | Self::Share { avatar, .. }
            | Self::Donation { avatar, .. } => avatar.as_deref(),
        }
    }
}

/// Anything that produces engagement notifications: the real live-stream
/// client outside this crate, or [`SyntheticSource`] for demos and tests.
/// The core only ever consumes this interface, never a concrete variant.
pub trait EventSource {
    /// Pull whatever notifications have accumulated. Must not block.
    fn poll(&mut self) -> Vec<LiveEvent>;
}

/// How many balls an event drops.
///
/// Fixed per-kind counts from configuration, except donations: `base +
/// floor(amount * per_amount)`, with the bonus capped so one large donation
/// cannot burst an unbounded number of spawns.
pub fn spawn_count(event: &LiveEvent, cfg: &GameConfig) -> u32 {
    match event {
        LiveEvent::Comment { .. } => cfg.balls_per_comment,
        LiveEvent::Like { .. } => cfg.balls_per_like,
        LiveEvent::Follow { .. } => cfg.balls_per_follow,
        LiveEvent::Share { .. } => cfg.balls_per_share,
        LiveEvent::Donation { amount, .. } => {
            let bonus = (amount.max(0.0) * cfg.donation_per_amount as f64).floor() as u32;
            cfg.donation_base + bonus.min(cfg.donation_bonus_cap)
        }
    }
}

/// A mutation bound for the next tick.
#[derive(Debug, Clone)]
pub enum Request {
    Event(LiveEvent),
    Spawn(SpawnRequest),
    Command {
        user: String,
        text: String,
        avatar: Option<String>,
    },
    Reset,
}

/// Single-consumer request queue.
///
/// Producers push from any thread; the game drains at tick start and runs
/// lock-free for the rest of the step, so event arrival never contends with
/// the integration phase.
#[derive(Debug, Default)]
pub struct RequestQueue {
    inner: Mutex<Vec<Request>>,
}

impl RequestQueue {
    pub fn push(&self, request: Request) {
        self.locked().push(request);
    }

    /// Take every pending request, in arrival order.
    pub fn drain(&self) -> Vec<Request> {
        std::mem::take(&mut *self.locked())
    }

    pub fn len(&self) -> usize {
        self.locked().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }

    fn locked(&self) -> MutexGuard<'_, Vec<Request>> {
        // A panicking producer cannot corrupt a Vec of requests; keep going.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Cloneable entry point for collaborators on other threads.
///
/// Every method enqueues and returns immediately: never blocks, never
/// fails. Effects become visible at the next tick.
#[derive(Debug, Clone)]
pub struct GameHandle {
    queue: Arc<RequestQueue>,
}

impl GameHandle {
    pub(crate) fn new(queue: Arc<RequestQueue>) -> Self {
        Self { queue }
    }

    /// Feed one engagement notification into the spawn pipeline.
    pub fn submit_event(&self, event: LiveEvent) {
        self.queue.push(Request::Event(event));
    }

    /// Drop balls directly, bypassing the event-to-spawn mapping.
    pub fn spawn(&self, request: SpawnRequest) {
        self.queue.push(Request::Spawn(request));
    }

    /// Submit a command on a user's behalf.
    pub fn submit_command(&self, user: &str, text: &str) {
        self.queue.push(Request::Command {
            user: user.to_owned(),
            text: text.to_owned(),
            avatar: None,
        });
    }

    /// Clear all balls and balances at the next tick.
    pub fn reset(&self) {
        self.queue.push(Request::Reset);
    }
}

/// Deterministic stand-in for the live-stream client.
///
/// Rotates through a small cast of viewers, weighting comments heaviest,
/// with the occasional donation and a paid `msg` command thrown in. Used by
/// the demo binary and tests.
pub struct SyntheticSource {
    rng: Pcg32,
    counter: u64,
}

const CAST: [&str; 8] = [
    "alice", "bob", "carol", "dave", "eve", "frank", "grace", "henry",
];

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            counter: 0,
        }
    }
}

impl EventSource for SyntheticSource {
    fn poll(&mut self) -> Vec<LiveEvent> {
        let user = CAST[self.counter as usize % CAST.len()].to_owned();
        let avatar = Some(format!("https://i.pravatar.cc/150?img={}", self.counter % 70));
        self.counter += 1;

        let event = match self.rng.random_range(0..10u32) {
            0..=3 => LiveEvent::Comment {
                user,
                text: "let's go!".to_owned(),
                avatar,
            },
            4..=5 => LiveEvent::Like { user, avatar },
            6 => LiveEvent::Follow { user, avatar },
            7 => LiveEvent::Share { user, avatar },
            8 => LiveEvent::Donation {
                user,
                amount: self.rng.random_range(1.0..100.0),
                avatar,
            },
            _ => LiveEvent::Comment {
                user,
                text: "msg hello from the stream".to_owned(),
                avatar,
            },
        };
        vec![event]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_counts_per_kind() {
        let cfg = GameConfig::default();
        let user = String::from("alice");
        let like = LiveEvent::Like {
            user: user.clone(),
            avatar: None,
        };
        let share = LiveEvent::Share {
            user,
            avatar: None,
        };
        assert_eq!(spawn_count(&like, &cfg), cfg.balls_per_like);
        assert_eq!(spawn_count(&share, &cfg), cfg.balls_per_share);
    }

    #[test]
    fn donation_scales_monotonically_up_to_the_cap() {
        let cfg = GameConfig::default();
        let count = |amount: f64| {
            spawn_count(
                &LiveEvent::Donation {
                    user: "dave".into(),
                    amount,
                    avatar: None,
                },
                &cfg,
            )
        };
        assert_eq!(count(0.0), cfg.donation_base);
        assert!(count(20.0) > count(5.0));
        // Base 5, bonus capped at 10: a $100 donation hits the cap exactly,
        // and a $10_000 one spawns no more.
        assert_eq!(count(100.0), cfg.max_donation_spawn());
        assert_eq!(count(10_000.0), cfg.max_donation_spawn());
        // Degenerate amounts never underflow.
        assert_eq!(count(-5.0), cfg.donation_base);
    }

    #[test]
    fn queue_drains_in_arrival_order() {
        let queue = RequestQueue::default();
        queue.push(Request::Reset);
        queue.push(Request::Command {
            user: "alice".into(),
            text: "msg hi".into(),
            avatar: None,
        });
        assert_eq!(queue.len(), 2);

        let drained = queue.drain();
        assert!(matches!(drained[0], Request::Reset));
        assert!(matches!(drained[1], Request::Command { .. }));
        assert!(queue.is_empty());
    }

    #[test]
    fn handle_pushes_through_to_the_queue() {
        let queue = Arc::new(RequestQueue::default());
        let handle = GameHandle::new(Arc::clone(&queue));
        handle.submit_event(LiveEvent::Like {
            user: "bob".into(),
            avatar: None,
        });
        handle.reset();
        assert_eq!(queue.drain().len(), 2);
    }

    #[test]
    fn synthetic_source_is_deterministic() {
        let mut a = SyntheticSource::new(3);
        let mut b = SyntheticSource::new(3);
        for _ in 0..50 {
            assert_eq!(a.poll(), b.poll());
        }
    }
}
