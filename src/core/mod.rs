//! Core deterministic primitives.
//!
//! All types in this module are designed for perfect cross-platform
//! determinism. They carry no game rules of their own.

pub mod fixed;
pub mod geom;
pub mod hash;
pub mod rng;

// Re-export core types
pub use fixed::{Fixed, FIXED_ONE};
pub use geom::{clamp_i32, rects_overlap};
pub use hash::{compute_state_hash, StateHash};
pub use rng::{next_seed, rand_range};
