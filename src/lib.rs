//! # Starfall Simulation Core
//!
//! Deterministic frame-by-frame simulation for the Starfall arcade
//! shooter: the pure state-transition core that rendering, audio, and
//! input shells consume.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     STARFALL CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                 │
//! │  ├── fixed.rs    - Q16.16 difficulty scalar                 │
//! │  ├── geom.rs     - AABB overlap, integer clamp              │
//! │  ├── rng.rs      - Seed-threaded LCG                        │
//! │  └── hash.rs     - State hashing for verification           │
//! │                                                             │
//! │  game/           - Game logic (deterministic)               │
//! │  ├── input.rs    - Per-tick intent                          │
//! │  ├── state.rs    - Entities, director, world state          │
//! │  ├── player.rs   - Movement, firing, damage                 │
//! │  ├── meteors.rs  - Falling field, recycling                 │
//! │  ├── enemies.rs  - Waves, patrol/leader AI, fire            │
//! │  ├── boss.rs     - Entrance + rest/burst machine            │
//! │  ├── collision.rs- Per-mode collision passes                │
//! │  ├── flow.rs     - Mode state machine, pacing               │
//! │  └── tick.rs     - One-frame orchestration                  │
//! │                                                             │
//! │  scores/         - High-score table (I/O collaborator)      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The `core/` and `game/` modules are **100% deterministic**:
//! - No floating point in game logic (the difficulty dial is Q16.16)
//! - All randomness flows through one explicitly threaded LCG seed
//! - No system time: every duration is counted in ticks
//! - Insertion-ordered `Vec` collections, no hash-map iteration
//!
//! Given the same seed and input script, [`game::tick::run`] produces the
//! identical final state (and state hash) on any platform.
//!
//! The simulation is also **total**: inconsistent input states are
//! reported through [`game::events::GameEvent::InvalidState`] instead of
//! panics, and every arithmetic path is clamped, so the tick loop cannot
//! crash the shell.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;
pub mod scores;

// Re-export commonly used types
pub use crate::core::fixed::{Fixed, FIXED_ONE};
pub use crate::core::hash::StateHash;
pub use crate::game::events::GameEvent;
pub use crate::game::input::{InputFrame, Steer};
pub use crate::game::state::{GameState, Mode};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Play-field width in pixels
pub const SCREEN_W: i32 = 800;

/// Play-field height in pixels
pub const SCREEN_H: i32 = 600;
