//! Starfall headless driver
//!
//! Runs the deterministic simulation with a scripted pilot - no window,
//! no audio. Useful for smoke-testing the core and demonstrating the
//! replay guarantee; the real shell feeds the same `tick` from keyboard
//! input instead.

use std::path::Path;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use starfall::game::input::{InputFrame, Steer};
use starfall::game::state::GameState;
use starfall::game::tick::tick;
use starfall::game::GameEvent;
use starfall::scores::ScoreBoard;
use starfall::{SCREEN_W, TICK_RATE, VERSION};

/// Shell-side fire rate: one bullet per six ticks of held fire.
const FIRE_RATE_FRAMES: u32 = 6;

/// Demo length: three minutes of simulated play.
const DEMO_TICKS: u32 = 180 * TICK_RATE;

/// Where the demo keeps its score table.
const SCORE_PATH: &str = "highscores.json";

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Starfall core v{}", VERSION);
    info!("Tick rate: {} Hz", TICK_RATE);

    let seed = 42;
    let mut state = GameState::new(seed);
    info!(seed, "simulation start");

    // Scripted pilot: sweep side to side and hold the trigger. The shell
    // owns the fire cooldown, exactly like a real input layer would.
    let mut fire_cooldown = 0u32;
    let mut ticks_survived = 0u32;

    for t in 0..DEMO_TICKS {
        let steer = if (t / 120) % 2 == 0 { Steer::Right } else { Steer::Left };

        let fire = fire_cooldown == 0 && state.player.alive;
        if fire {
            fire_cooldown = FIRE_RATE_FRAMES;
        } else {
            fire_cooldown = fire_cooldown.saturating_sub(1);
        }

        let (next, events) = tick(&state, InputFrame { steer, fire });
        state = next;
        ticks_survived = t + 1;

        for event in &events {
            match event {
                GameEvent::BossEntered => info!(tick = t, "boss entered"),
                GameEvent::BossDefeated => info!(tick = t, score = state.score, "boss defeated"),
                GameEvent::PlayerDefeated => info!(tick = t, score = state.score, "player defeated"),
                GameEvent::InvalidState(detail) => {
                    tracing::warn!(tick = t, detail = %detail, "inconsistent state reported")
                }
            }
        }

        if !state.player.alive {
            break;
        }
    }

    info!(
        ticks = ticks_survived,
        score = state.score,
        mode = ?state.mode,
        hearts = state.player.hearts,
        "simulation over"
    );
    info!("final state hash: {}", hex::encode(state.compute_hash()));

    // Keep the demo pilot honest on the local leaderboard
    let path = Path::new(SCORE_PATH);
    let mut board = ScoreBoard::load(path).context("loading score table")?;
    if board.submit("Autopilot", state.score) {
        board.save(path).context("saving score table")?;
    }
    for (rank, entry) in board.top(3).iter().enumerate() {
        info!("top {}: {} - {}", rank + 1, entry.name, entry.score);
    }

    debug_assert!(state.player.x >= 0 && state.player.x <= SCREEN_W);

    Ok(())
}
