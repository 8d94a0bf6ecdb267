//! Game Logic Module
//!
//! All simulation code. 100% deterministic.
//!
//! ## Module Structure
//!
//! - `input`: per-tick intent (steer/fire)
//! - `state`: entity records, difficulty director, world state
//! - `events`: domain events emitted toward the shell
//! - `player`: movement, firing, damage, invulnerability
//! - `meteors`: motion, recycling, population top-up
//! - `enemies`: wave layout, patrol/leader AI, fire control
//! - `boss`: entrance, tracking, rest/burst fire pattern
//! - `collision`: per-mode collision passes + explosion upkeep
//! - `flow`: top-level mode state machine and difficulty pacing
//! - `tick`: one-frame orchestration over all of the above

pub mod boss;
pub mod collision;
pub mod enemies;
pub mod events;
pub mod flow;
pub mod input;
pub mod meteors;
pub mod player;
pub mod state;
pub mod tick;

// Re-export key types
pub use events::GameEvent;
pub use input::{InputFrame, Steer};
pub use state::{Director, GameState, Mode, PlayerState};
pub use tick::{run, tick};
