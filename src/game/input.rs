//! Per-Tick Input Intent
//!
//! The shell translates keyboard/window events into one `InputFrame` per
//! tick; the core never sees raw input devices. Fire rate limiting is the
//! shell's job - a frame with `fire = true` always spawns a bullet.

use serde::{Deserialize, Serialize};

/// Horizontal steering intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Steer {
    /// No horizontal movement.
    #[default]
    None,
    /// Move toward x = 0.
    Left,
    /// Move toward the right screen edge.
    Right,
}

impl Steer {
    /// Signed unit direction (-1, 0, +1).
    #[inline]
    pub fn dx(self) -> i32 {
        match self {
            Steer::None => 0,
            Steer::Left => -1,
            Steer::Right => 1,
        }
    }
}

/// The complete input intent for one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Horizontal steering.
    pub steer: Steer,
    /// Fire intent (already rate-limited by the shell).
    pub fire: bool,
}

impl InputFrame {
    /// An idle frame: no steering, no fire.
    pub const fn idle() -> Self {
        Self {
            steer: Steer::None,
            fire: false,
        }
    }

    /// Steering only.
    pub const fn steering(steer: Steer) -> Self {
        Self { steer, fire: false }
    }

    /// Steering plus fire.
    pub const fn with_fire(steer: Steer) -> Self {
        Self { steer, fire: true }
    }

    /// True when the frame carries no intent at all.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.steer == Steer::None && !self.fire
    }
}
