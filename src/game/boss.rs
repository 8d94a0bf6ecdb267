//! Boss Subsystem
//!
//! Entrance choreography, horizontal player tracking, and the two-phase
//! rest/burst fire pattern. The machine is `entering -> resting <-> bursting`;
//! every transition lives here, the hit handling lives in the collision
//! layer.

use crate::core::fixed::{scaled_floor, to_fixed, Fixed};
use crate::core::geom::clamp_i32;
use crate::game::state::{Boss, BossPhase, Director, EnemyBullet, PlayerState};
use crate::SCREEN_W;

/// Base ticks between shot pairs.
const BASE_CADENCE: u32 = 8;
/// Base ticks of rest between bursts.
const BASE_PAUSE: u32 = 60;
/// Base shot pairs per burst.
const BASE_BURST_PAIRS: u32 = 10;
/// Hard ceiling on pairs per burst.
const MAX_BURST_PAIRS: u32 = 16;
/// Cadence floor - difficulty can never push the pattern faster than this.
const MIN_CADENCE: u32 = 6;
/// Pause floor.
const MIN_PAUSE: u32 = 36;
/// Horizontal inset of the two cannons from the hull edges.
const CANNON_INSET: i32 = 28;

/// Create the boss above the screen, full health, entering.
pub fn spawn() -> Boss {
    Boss {
        x: SCREEN_W / 2 - Boss::WIDTH / 2,
        y: -Boss::HEIGHT,
        hp: Boss::MAX_HP,
        alive: true,
        entering: true,
        entry_y: 20,
        cooldown: 0,
        phase: BossPhase::Rest,
        phase_timer: 0,
        burst_shots: 0,
        cadence: BASE_CADENCE,
        pause: BASE_PAUSE,
        burst_pairs: BASE_BURST_PAIRS,
    }
}

/// Advance the boss's position and timers one tick.
///
/// While entering, descend to the entry line and then settle into a short
/// rest. In combat, track the player's x in small steps and run the
/// cooldown and phase timers toward zero.
pub fn update_motion(boss: &Boss, player: &PlayerState) -> Boss {
    if !boss.alive {
        return *boss;
    }

    if boss.entering {
        let ny = boss.y + Boss::ENTRY_SPEED;
        if ny >= boss.entry_y {
            return Boss {
                y: boss.entry_y,
                entering: false,
                phase: BossPhase::Rest,
                phase_timer: Boss::ENTRY_REST_TICKS,
                cooldown: 0,
                ..*boss
            };
        }
        return Boss {
            y: ny,
            cooldown: 0,
            ..*boss
        };
    }

    let cooldown = boss.cooldown.saturating_sub(1);
    let phase_timer = boss.phase_timer.saturating_sub(1);

    let target = player.center_x();
    let dx = match target.cmp(&boss.center_x()) {
        std::cmp::Ordering::Greater => Boss::TRACK_SPEED,
        std::cmp::Ordering::Less => -Boss::TRACK_SPEED,
        std::cmp::Ordering::Equal => 0,
    };
    let x = clamp_i32(boss.x + dx, 0, SCREEN_W - Boss::WIDTH);

    Boss {
        x,
        cooldown,
        phase_timer,
        ..*boss
    }
}

/// Run one tick of the fire-pattern machine.
///
/// Resting waits out the phase timer, then flips to bursting. Bursting
/// emits a left+right pair from the cannons each time the cooldown
/// expires; once the pair quota is met, the boss rests again. Difficulty
/// tightens cadence, shortens the pause, and adds pairs (within floors
/// and the ceiling).
pub fn fire(boss: &Boss, director: &Director) -> (Boss, Vec<EnemyBullet>) {
    if !boss.alive || boss.entering {
        return (*boss, Vec::new());
    }

    let dial: Fixed = director.difficulty;
    let cadence = (boss.cadence as i32 - scaled_floor(dial, to_fixed(0.3))).max(MIN_CADENCE as i32) as u32;
    let pause = (boss.pause as i32 - scaled_floor(dial, to_fixed(1.5))).max(MIN_PAUSE as i32) as u32;
    let max_pairs =
        (boss.burst_pairs as i32 + scaled_floor(dial, to_fixed(0.5))).min(MAX_BURST_PAIRS as i32) as u32;

    let mut next = *boss;

    if next.phase == BossPhase::Rest {
        if next.phase_timer > 0 {
            return (next, Vec::new());
        }
        next = Boss {
            phase: BossPhase::Burst,
            burst_shots: 0,
            cooldown: 0,
            ..next
        };
    }

    // Bursting from here on
    if next.cooldown > 0 {
        return (next, Vec::new());
    }

    let left_x = next.x + CANNON_INSET;
    let right_x = next.x + Boss::WIDTH - CANNON_INSET - EnemyBullet::WIDTH;
    let y = next.y + Boss::HEIGHT - 10;
    let vy = EnemyBullet::BASE_SPEED + scaled_floor(dial, to_fixed(0.5));

    let pair = vec![
        EnemyBullet::new(left_x, y, vy),
        EnemyBullet::new(right_x, y, vy),
    ];

    let fired = next.burst_shots + 1;
    next = if fired >= max_pairs {
        Boss {
            phase: BossPhase::Rest,
            phase_timer: pause,
            burst_shots: 0,
            cooldown: cadence,
            ..next
        }
    } else {
        Boss {
            burst_shots: fired,
            cooldown: cadence,
            ..next
        }
    };

    (next, pair)
}

// =============================================================================
// TESTS
// =============================================================================
