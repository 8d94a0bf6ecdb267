//! Meteor Subsystem
//!
//! Meteors fall forever: motion never destroys one, it only recycles it to
//! a fresh off-screen roll. Only the collision layer removes meteors, and
//! the top-up pass puts the population back afterwards.

use crate::core::rng::rand_range;
use crate::game::state::{GameState, Meteor};
use crate::{SCREEN_H, SCREEN_W};

/// Horizontal slack outside the screen before a meteor recycles.
const EXIT_MARGIN_X: i32 = 40;
/// Vertical slack below the screen before a meteor recycles.
const EXIT_MARGIN_Y: i32 = 10;

/// Roll a fresh meteor above the screen.
///
/// `speed_bonus` raises the vertical-speed band; the difficulty director
/// increases it as boss cycles complete.
pub(crate) fn roll_meteor(seed: u32, speed_bonus: i32) -> (Meteor, u32) {
    let (s, x) = rand_range(seed, 0, SCREEN_W - Meteor::SIZE);
    let (s, y) = rand_range(s, -140, -100);
    let (s, vx) = rand_range(s, -3, 3);
    let (s, vy) = rand_range(s, 1 + speed_bonus, 4 + speed_bonus);
    (Meteor::new(x, y, vx, vy), s)
}

/// Advance every meteor by its velocity (plus the vertical bonus).
///
/// A meteor that exits the screen is replaced with a fresh roll, never
/// dropped - this function conserves the collection length exactly.
pub fn advance(meteors: &[Meteor], seed: u32, speed_bonus: i32) -> (Vec<Meteor>, u32) {
    let mut next = Vec::with_capacity(meteors.len());
    let mut s = seed;

    for m in meteors {
        let nx = m.x + m.vx;
        let ny = m.y + m.vy + speed_bonus;

        let exited = ny > SCREEN_H + EXIT_MARGIN_Y || nx < -EXIT_MARGIN_X || nx > SCREEN_W + EXIT_MARGIN_X;
        if exited {
            let (fresh, advanced) = roll_meteor(s, speed_bonus);
            next.push(fresh);
            s = advanced;
        } else {
            next.push(Meteor { x: nx, y: ny, ..*m });
        }
    }

    (next, s)
}

/// Top the population back up to eight meteors.
///
/// Collisions destroy meteors outright; this pass restores the count
/// while the director allows respawning. The orchestrator turns the flag
/// off ahead of the boss so destroyed meteors stay gone.
pub fn top_up(state: &GameState) -> GameState {
    if !state.director.respawn_meteors || state.meteors.len() >= GameState::METEOR_POPULATION {
        return state.clone();
    }

    let mut meteors = state.meteors.clone();
    let mut s = state.seed;
    while meteors.len() < GameState::METEOR_POPULATION {
        let (fresh, advanced) = roll_meteor(s, state.director.meteor_bonus);
        meteors.push(fresh);
        s = advanced;
    }

    GameState {
        meteors,
        seed: s,
        ..state.clone()
    }
}

// =============================================================================
// TESTS
// =============================================================================
