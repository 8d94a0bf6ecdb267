//! Simulation Tick
//!
//! One tick = one full pass through input -> per-mode updates ->
//! collisions -> flow -> explosion upkeep, returning the next world state
//! plus the events emitted along the way. 100% deterministic: same state,
//! same input, same result.

use crate::core::rng::next_seed;
use crate::game::boss;
use crate::game::collision;
use crate::game::enemies;
use crate::game::events::GameEvent;
use crate::game::flow;
use crate::game::input::InputFrame;
use crate::game::meteors;
use crate::game::player;
use crate::game::state::{GameState, Mode};

/// Advance the world one tick.
///
/// The event list covers this tick only; the returned state carries an
/// empty queue. The caller owns pacing (nominally 60 ticks per second)
/// and fire-rate limiting.
pub fn tick(state: &GameState, input: InputFrame) -> (GameState, Vec<GameEvent>) {
    let player = player::move_player(&state.player, input.steer);
    let director = flow::adjust_director(&state.director, player.alive);

    let mut bullets = state.bullets.clone();
    if input.fire && player.alive {
        bullets = player::fire(&player, &bullets);
    }

    let staged = match state.mode {
        Mode::Meteors => {
            let bullets = player::advance_bullets(&bullets);
            let (mets, seed) = meteors::advance(&state.meteors, state.seed, director.meteor_bonus);
            let merged = GameState {
                player,
                meteors: mets,
                bullets,
                seed,
                director,
                ..state.clone()
            };
            let merged = collision::resolve_meteor_collisions(&merged);
            meteors::top_up(&merged)
        }

        Mode::Enemies | Mode::Mixed => {
            let bullets = player::advance_bullets(&bullets);
            let (director, predicted_x) = flow::predict_player(&director, &player);
            let moved = enemies::update_ai(&state.enemies, &player, &director);
            let flying = enemies::advance_enemy_bullets(&state.enemy_bullets);
            let (moved, shots, mut seed) =
                enemies::enemy_fire(&moved, state.seed, &director, predicted_x);
            if shots.is_empty() {
                // Burn one draw so the stream position does not depend on
                // whether anybody fired this tick
                seed = next_seed(seed).0;
            }
            let mut enemy_bullets = flying;
            enemy_bullets.extend(shots);

            let merged = GameState {
                player,
                enemies: moved,
                bullets,
                enemy_bullets,
                seed,
                director,
                ..state.clone()
            };
            let merged = collision::resolve_enemy_collisions(&merged);

            if merged.mode == Mode::Mixed {
                let (mets, seed) =
                    meteors::advance(&merged.meteors, merged.seed, merged.director.meteor_bonus);
                let merged = GameState {
                    meteors: mets,
                    seed,
                    ..merged
                };
                let merged = collision::resolve_meteor_collisions(&merged);
                meteors::top_up(&merged)
            } else {
                merged
            }
        }

        Mode::Boss => {
            let bullets = player::advance_bullets(&bullets);
            let flying = enemies::advance_enemy_bullets(&state.enemy_bullets);

            let (boss, shots) = match state.boss {
                Some(b) => {
                    let moved = boss::update_motion(&b, &player);
                    let (after, shots) = boss::fire(&moved, &director);
                    (Some(after), shots)
                }
                None => (None, Vec::new()),
            };
            let mut enemy_bullets = flying;
            enemy_bullets.extend(shots);

            let merged = GameState {
                player,
                bullets,
                enemy_bullets,
                boss,
                director,
                ..state.clone()
            };

            // Leftover meteors from the mixed phase keep falling (no top-up)
            let merged = if merged.meteors.is_empty() {
                merged
            } else {
                let (mets, seed) =
                    meteors::advance(&merged.meteors, merged.seed, merged.director.meteor_bonus);
                let merged = GameState {
                    meteors: mets,
                    seed,
                    ..merged
                };
                collision::resolve_meteor_collisions(&merged)
            };

            let merged = collision::resolve_enemy_collisions(&merged);
            collision::resolve_boss_collisions(&merged)
        }
    };

    let staged = collision::advance_explosions(&staged);
    let mut next = flow::step(&staged);
    let events = next.take_events();
    (next, events)
}

/// Fold [`tick`] over a scripted input sequence.
///
/// Returns the final state and every event emitted, in order. This is the
/// replay entry point: the same seed and script always reproduce the same
/// run.
pub fn run(
    initial: GameState,
    inputs: impl IntoIterator<Item = InputFrame>,
) -> (GameState, Vec<GameEvent>) {
    let mut state = initial;
    let mut all_events = Vec::new();

    for input in inputs {
        let (next, events) = tick(&state, input);
        all_events.extend(events);
        state = next;
    }

    (state, all_events)
}

// =============================================================================
// TESTS
// =============================================================================
