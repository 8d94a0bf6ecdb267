//! Flow Orchestrator
//!
//! The top-level mode state machine: meteors -> enemy waves -> mixed
//! waves -> boss, looping back to mixed with rising difficulty after each
//! boss defeat. Also owns the background difficulty creep and the player
//! predictor the enemy aim uses.

use tracing::debug;

use crate::core::fixed::{
    to_float, DIFFICULTY_CREEP, DIFFICULTY_MAX, DIFFICULTY_PER_BOSS, DIFFICULTY_PER_WAVE,
};
use crate::game::boss;
use crate::game::enemies;
use crate::game::events::GameEvent;
use crate::game::state::{Director, Enemy, GameState, Mode, PlayerState};

/// Score that ends the opening meteor phase.
const SCORE_TO_ENEMIES: u32 = 300;
/// Ticks between enemy waves once the board clears.
const ENEMY_WAVE_COOLDOWN: u32 = 90;
/// Ticks between mixed-mode waves once the board clears.
const MIXED_WAVE_COOLDOWN: u32 = 90;
/// Quiet ticks between the last mixed wave and the boss entrance.
const PREBOSS_PAUSE_TICKS: u32 = 180;
/// Wave size everywhere after the opening wave.
const STANDARD_WAVE_SIZE: u32 = 5;

/// True when no enemy is flying or exploding - the trigger for the next
/// wave or phase.
fn board_cleared(enemies: &[Enemy]) -> bool {
    enemies.iter().all(|e| !e.alive && !e.exploding)
}

/// Run the wave/mode state machine once.
///
/// Exactly one transition (or none) applies per call; when nothing
/// applies the state passes through unchanged.
pub fn step(state: &GameState) -> GameState {
    let d = state.director;

    match state.mode {
        Mode::Meteors => {
            if state.score < SCORE_TO_ENEMIES {
                return state.clone();
            }
            // First wave: clear the meteor field and bring in the enemies
            let (wave, seed) = enemies::spawn_wave(d.next_wave_size, state.seed);
            debug!(size = d.next_wave_size, "first enemy wave, leaving meteor phase");
            GameState {
                mode: Mode::Enemies,
                enemies: wave,
                seed,
                meteors: Vec::new(),
                director: Director {
                    wave: 1,
                    wave_cooldown: 0,
                    ..d
                },
                ..state.clone()
            }
        }

        Mode::Enemies => {
            if state.score >= d.mix_threshold {
                let (wave, seed) = enemies::spawn_wave(STANDARD_WAVE_SIZE, state.seed);
                debug!(score = state.score, "mix threshold reached");
                return GameState {
                    mode: Mode::Mixed,
                    enemies: wave,
                    seed,
                    director: Director {
                        mixed_waves_spawned: 1,
                        wave_cooldown: 0,
                        respawn_meteors: true,
                        preboss_pause: 0,
                        ..d
                    },
                    ..state.clone()
                };
            }

            if !board_cleared(&state.enemies) {
                return state.clone();
            }

            if d.wave_cooldown > 0 {
                return GameState {
                    director: Director {
                        wave_cooldown: d.wave_cooldown - 1,
                        ..d
                    },
                    ..state.clone()
                };
            }

            // Next wave, a bit harder
            let difficulty = (d.difficulty + DIFFICULTY_PER_WAVE).min(DIFFICULTY_MAX);
            let (wave, seed) = enemies::spawn_wave(STANDARD_WAVE_SIZE, state.seed);
            debug!(
                wave = d.wave + 1,
                difficulty = to_float(difficulty),
                "spawning enemy wave"
            );
            GameState {
                enemies: wave,
                seed,
                director: Director {
                    difficulty,
                    reaction_speed: Director::reaction_for(difficulty),
                    wave: d.wave + 1,
                    next_wave_size: STANDARD_WAVE_SIZE,
                    wave_cooldown: ENEMY_WAVE_COOLDOWN,
                    ..d
                },
                ..state.clone()
            }
        }

        Mode::Mixed => {
            if !board_cleared(&state.enemies) {
                return state.clone();
            }

            // (a) more mixed rounds to go
            if d.mixed_waves_spawned < d.mixed_rounds_target {
                if d.wave_cooldown > 0 {
                    return GameState {
                        director: Director {
                            wave_cooldown: d.wave_cooldown - 1,
                            ..d
                        },
                        ..state.clone()
                    };
                }
                let (wave, seed) = enemies::spawn_wave(STANDARD_WAVE_SIZE, state.seed);
                debug!(round = d.mixed_waves_spawned + 1, "spawning mixed wave");
                return GameState {
                    enemies: wave,
                    seed,
                    director: Director {
                        mixed_waves_spawned: d.mixed_waves_spawned + 1,
                        respawn_meteors: true,
                        wave_cooldown: MIXED_WAVE_COOLDOWN,
                        ..d
                    },
                    ..state.clone()
                };
            }

            // (b) rounds complete: stop the meteor top-up, schedule the boss
            if d.respawn_meteors {
                return GameState {
                    director: Director {
                        respawn_meteors: false,
                        preboss_pause: PREBOSS_PAUSE_TICKS,
                        ..d
                    },
                    ..state.clone()
                };
            }

            // (c) quiet before the storm
            if d.preboss_pause > 0 {
                return GameState {
                    director: Director {
                        preboss_pause: d.preboss_pause - 1,
                        ..d
                    },
                    ..state.clone()
                };
            }

            // (d) bring in the boss
            if state.boss.is_none() {
                debug!(cycle = d.cycles, "boss entering");
                let next = GameState {
                    mode: Mode::Boss,
                    boss: Some(boss::spawn()),
                    meteors: Vec::new(),
                    ..state.clone()
                };
                return next.with_events([GameEvent::BossEntered]);
            }
            state.clone()
        }

        Mode::Boss => {
            let defeated = state.boss.map(|b| !b.alive).unwrap_or(false);
            if !defeated {
                return state.clone();
            }

            // Cycle complete: raise the stakes and return to mixed waves
            let difficulty = (d.difficulty + DIFFICULTY_PER_BOSS).min(DIFFICULTY_MAX);
            debug!(
                cycle = d.cycles + 1,
                difficulty = to_float(difficulty),
                "boss defeated, cycling back to mixed waves"
            );
            GameState {
                mode: Mode::Mixed,
                enemies: Vec::new(),
                boss: None,
                director: Director {
                    difficulty,
                    reaction_speed: Director::reaction_for(difficulty),
                    meteor_bonus: (d.meteor_bonus + 1).min(Director::METEOR_BONUS_MAX),
                    mixed_waves_spawned: 0,
                    respawn_meteors: true,
                    preboss_pause: 0,
                    wave_cooldown: 0,
                    cycles: d.cycles + 1,
                    ..d
                },
                ..state.clone()
            }
        }
    }
}

/// Background difficulty creep: while the player lives, the dial rises
/// 0.002 per tick toward the cap, independent of the wave machine.
pub fn adjust_director(director: &Director, player_alive: bool) -> Director {
    if !player_alive {
        return *director;
    }
    Director {
        difficulty: (director.difficulty + DIFFICULTY_CREEP).min(DIFFICULTY_MAX),
        ..*director
    }
}

/// One-tick-lag player predictor: the enemy aim uses the player's current
/// x, and the director records it for future refinement.
pub fn predict_player(director: &Director, player: &PlayerState) -> (Director, i32) {
    (
        Director {
            last_player_x: player.x,
            ..*director
        },
        player.x,
    )
}

// =============================================================================
// TESTS
// =============================================================================
