//! Q16.16 Fixed-Point Difficulty Scalar
//!
//! The simulation runs on integer pixels; the only fractional quantity is
//! the difficulty dial (0..10) and the cadences derived from it. Keeping it
//! in Q16.16 keeps the tick loop free of floating point, so the same input
//! script replays bit-identically on any platform.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │  Bit Layout: Q16.16 (32-bit signed integer)   │
//! ├───────────────────────────────────────────────┤
//! │  [S][IIIIIIIIIIIIIII][FFFFFFFFFFFFFFFF]       │
//! │  Range needed here: 0.0 .. 10.0               │
//! │  Precision: 1/65536 per tick of creep         │
//! └───────────────────────────────────────────────┘
//! ```

/// Q16.16 fixed-point number stored as i32.
pub type Fixed = i32;

/// Number of fractional bits (16)
pub const FIXED_SCALE: i32 = 16;

/// 1.0 in fixed-point (65536)
pub const FIXED_ONE: Fixed = 1 << FIXED_SCALE;

// =============================================================================
// DIFFICULTY TUNING (all derived at compile time - no float in the tick loop)
// =============================================================================

/// Starting difficulty: 1.0
pub const DIFFICULTY_START: Fixed = to_fixed(1.0);

/// Difficulty ceiling: 10.0
pub const DIFFICULTY_MAX: Fixed = to_fixed(10.0);

/// Baseline creep applied every tick while the player lives: 0.002
pub const DIFFICULTY_CREEP: Fixed = to_fixed(0.002);

/// Bump applied per cleared enemy wave: 0.6
pub const DIFFICULTY_PER_WAVE: Fixed = to_fixed(0.6);

/// Bump applied per defeated boss: 1.0
pub const DIFFICULTY_PER_BOSS: Fixed = FIXED_ONE;

// =============================================================================
// CORE OPERATIONS
// =============================================================================

/// Convert a compile-time float to fixed-point.
///
/// # Warning
/// Only use at compile-time or initialization. NEVER in the tick loop.
#[inline]
pub const fn to_fixed(f: f64) -> Fixed {
    (f * (FIXED_ONE as f64)) as Fixed
}

/// Convert an integer to fixed-point.
#[inline]
pub const fn from_int(v: i32) -> Fixed {
    v << FIXED_SCALE
}

/// Multiply two fixed-point values.
#[inline]
pub fn fixed_mul(a: Fixed, b: Fixed) -> Fixed {
    ((a as i64 * b as i64) >> FIXED_SCALE) as Fixed
}

/// Truncate a fixed-point value to its integer part (floor for the
/// non-negative dial).
#[inline]
pub const fn fixed_floor(a: Fixed) -> i32 {
    a >> FIXED_SCALE
}

/// `int(dial * factor)` in one step: scale the difficulty dial by a tuning
/// factor and truncate, exactly how every cadence/window formula consumes it.
#[inline]
pub fn scaled_floor(dial: Fixed, factor: Fixed) -> i32 {
    fixed_floor(fixed_mul(dial, factor))
}

/// Convert fixed-point to float for display/logging only.
#[inline]
pub fn to_float(a: Fixed) -> f64 {
    a as f64 / FIXED_ONE as f64
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert_eq!(FIXED_ONE, 65536);
        assert_eq!(DIFFICULTY_START, 65536);
        assert_eq!(DIFFICULTY_MAX, 655360);
        assert_eq!(DIFFICULTY_CREEP, 131); // floor(0.002 * 65536)
    }

    #[test]
    fn test_fixed_mul() {
        assert_eq!(fixed_mul(from_int(3), from_int(4)), from_int(12));
        assert_eq!(fixed_mul(to_fixed(0.5), from_int(10)), from_int(5));
    }

    #[test]
    fn test_fixed_floor_truncates() {
        assert_eq!(fixed_floor(to_fixed(1.99)), 1);
        assert_eq!(fixed_floor(to_fixed(0.3)), 0);
        assert_eq!(fixed_floor(from_int(7)), 7);
    }

    #[test]
    fn test_scaled_floor_matches_cadence_formulas() {
        // The enemy aim window uses int(difficulty * 8): at difficulty 4.0
        // that is 32, at 1.0 it is 8.
        assert_eq!(scaled_floor(from_int(4), to_fixed(8.0)), 32);
        assert_eq!(scaled_floor(DIFFICULTY_START, to_fixed(8.0)), 8);

        // Boss cadence uses int(difficulty * 0.3): 1.2 truncates to 1.
        assert_eq!(scaled_floor(from_int(4), to_fixed(0.3)), 1);
        assert_eq!(scaled_floor(DIFFICULTY_START, to_fixed(0.3)), 0);
    }

    #[test]
    fn test_creep_accumulates_and_caps() {
        // ~0.002 per tick: one minute of play adds roughly 7 difficulty,
        // and the dial never escapes its ceiling.
        let mut dial = DIFFICULTY_START;
        for _ in 0..3600 {
            dial = (dial + DIFFICULTY_CREEP).min(DIFFICULTY_MAX);
        }
        assert!(dial > DIFFICULTY_START + from_int(7));
        assert!(dial <= DIFFICULTY_MAX);

        for _ in 0..100_000 {
            dial = (dial + DIFFICULTY_CREEP).min(DIFFICULTY_MAX);
        }
        assert_eq!(dial, DIFFICULTY_MAX);
    }
}
