//! Plinko Live entry point
//!
//! Headless demo: a synthetic event source stands in for the live-stream
//! ingestion client, pushing engagement events from its own thread while
//! the main thread runs the fixed-step simulation and logs what lands.
//! Pass a JSON config path as the only argument to override defaults.

use std::time::{Duration, Instant};

use plinko_live::consts::MAX_SUBSTEPS;
use plinko_live::{EventSource, Game, GameConfig, SyntheticSource};

/// How long the demo runs before printing the final leaderboard.
const RUN_SECS: u64 = 20;

fn main() {
    env_logger::init();

    let cfg = load_config();
    log::info!("Plinko Live (headless) starting...");
    log::debug!(
        "config: {}",
        serde_json::to_string(&cfg).unwrap_or_default()
    );

    let dt = cfg.dt;
    let mut game = match Game::new(cfg) {
        Ok(game) => game,
        Err(err) => {
            log::error!("invalid configuration: {err}");
            std::process::exit(1);
        }
    };

    // Event producer thread: the ingestion client stand-in. It only ever
    // talks to the game through the handle.
    let handle = game.handle();
    let producer = std::thread::spawn(move || {
        let mut source = SyntheticSource::new(1);
        for _ in 0..RUN_SECS * 2 {
            for event in source.poll() {
                handle.submit_event(event);
            }
            std::thread::sleep(Duration::from_millis(500));
        }
    });

    // Fixed-step loop with catch-up, capped to avoid the spiral of death.
    let started = Instant::now();
    let mut last = Instant::now();
    let mut accumulator = 0.0f32;
    let mut next_report = Duration::from_secs(5);

    while started.elapsed() < Duration::from_secs(RUN_SECS) {
        let now = Instant::now();
        accumulator += (now - last).as_secs_f32().min(0.1);
        last = now;

        let mut substeps = 0;
        while accumulator >= dt && substeps < MAX_SUBSTEPS {
            let output = game.tick(dt);
            for effect in &output.effects {
                log::info!(
                    "effect: {} by {} ({:?})",
                    effect.command,
                    effect.user,
                    effect.argument
                );
            }
            accumulator -= dt;
            substeps += 1;
        }

        if started.elapsed() >= next_report {
            next_report += Duration::from_secs(5);
            log::info!(
                "{} balls live, {} users scored",
                game.balls().len(),
                game.ledger().len()
            );
        }

        std::thread::sleep(Duration::from_millis(4));
    }
    let _ = producer.join();

    log::info!("final leaderboard:");
    for (rank, entry) in game.leaderboard().iter().enumerate() {
        log::info!("  {}. {} - {}", rank + 1, entry.user, entry.balance);
    }
}

fn load_config() -> GameConfig {
    let Some(path) = std::env::args().nth(1) else {
        return GameConfig::default();
    };
    let json = match std::fs::read_to_string(&path) {
        Ok(json) => json,
        Err(err) => {
            log::error!("cannot read {path}: {err}");
            std::process::exit(1);
        }
    };
    match GameConfig::from_json(&json) {
        Ok(cfg) => cfg,
        Err(err) => {
            log::error!("invalid configuration in {path}: {err}");
            std::process::exit(1);
        }
    }
}
