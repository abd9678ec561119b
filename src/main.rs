//! Broadcast 14 headless runner
//!
//! Stands in for the hosting shell: runs a seeded game on autopilot at a
//! fixed timestep and logs how it went.
//!
//! Usage: `broadcast14 [seed] [tuning.json]`

use std::process::ExitCode;

use broadcast14::consts::*;
use broadcast14::sim::{GameEvent, GameState, Outcome, TickInput, tick};
use broadcast14::tuning::Tuning;

const DEFAULT_SEED: u64 = 14;

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next().map(|arg| arg.parse::<u64>()) {
        None => DEFAULT_SEED,
        Some(Ok(seed)) => seed,
        Some(Err(e)) => {
            log::error!("Invalid seed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let tuning = match args.next() {
        None => Tuning::default(),
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
    };

    log::info!("Broadcast 14 (headless) starting with seed: {}", seed);
    let outcome = run(GameState::with_tuning(seed, tuning));
    match outcome {
        Outcome::Victory => ExitCode::SUCCESS,
        _ => ExitCode::from(2),
    }
}

fn load_tuning(path: &str) -> Result<Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(Tuning::from_json(&json)?)
}

/// Fixed-step loop until the run ends or the campaign clock runs out
fn run(mut state: GameState) -> Outcome {
    // Every night plus every possible fuse extension, with headroom
    let max_ticks = (state.tuning.night_time_cap() * TOTAL_NIGHTS as f32 / SIM_DT) as u64 * 2;
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut stabilized = 0u32;
    let mut hits = 0u32;
    while !state.is_terminal() && state.time_ticks < max_ticks {
        tick(&mut state, &input, SIM_DT);
        for event in &state.events {
            match event {
                GameEvent::RadioStabilized { .. } => stabilized += 1,
                GameEvent::CreatureHit { .. } => hits += 1,
                _ => {}
            }
        }
    }

    let snapshot = state.snapshot();
    log::info!(
        "Run over: {:?} on night {} after {} ticks ({} radios stabilized, {} hits taken, {} credits)",
        snapshot.outcome,
        snapshot.night,
        state.time_ticks,
        stabilized,
        hits,
        snapshot.credits
    );
    if let Ok(json) = serde_json::to_string(&snapshot) {
        log::debug!("Final snapshot: {}", json);
    }
    snapshot.outcome
}
