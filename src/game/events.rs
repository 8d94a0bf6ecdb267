//! Game Events
//!
//! The core's only side-effect-free channel to the outside: the shell reads
//! the per-tick event list to play sounds, switch screens, or log anomalies.

use serde::{Deserialize, Serialize};

/// A domain event emitted during one tick.
///
/// The queue is drained by the consumer every tick; events never persist
/// across frames.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// The boss has spawned and is entering the screen.
    BossEntered,

    /// The boss's hit points reached zero this tick.
    BossDefeated,

    /// The player ran out of hearts this tick.
    PlayerDefeated,

    /// The world was handed to a pass it cannot legally run on; the detail
    /// names the inconsistency. Observational only - the simulation still
    /// returns a valid next state.
    InvalidState(String),
}

impl GameEvent {
    /// Detail tag for the boss pass running without a boss instance.
    pub const BOSS_MODE_WITHOUT_INSTANCE: &'static str = "boss_mode_without_instance";

    /// Shorthand for the boss-pass consistency violation.
    pub fn boss_mode_without_instance() -> Self {
        GameEvent::InvalidState(Self::BOSS_MODE_WITHOUT_INSTANCE.to_string())
    }

    /// True for events that report an inconsistency rather than gameplay.
    pub fn is_anomaly(&self) -> bool {
        matches!(self, GameEvent::InvalidState(_))
    }
}
