//! Deterministic Random Number Generator
//!
//! A linear congruential generator threaded explicitly through the
//! simulation: every draw consumes a seed and returns the successor seed.
//! Given the same seed, produces the identical sequence on all platforms.

/// LCG multiplier (Numerical Recipes constants).
pub const LCG_MUL: u32 = 1_664_525;

/// LCG increment.
pub const LCG_INC: u32 = 1_013_904_223;

/// Advance the generator one step.
///
/// Returns `(seed', value)` where `seed' = seed * MUL + INC (mod 2^32)`;
/// the drawn value is the new seed itself.
///
/// # Determinism Guarantee
///
/// The whole simulation is reproducible because this is the only source
/// of randomness and the seed is passed in and returned out everywhere.
/// Reusing a stale seed (or dropping a returned one) breaks replays.
///
/// # Example
///
/// ```
/// use starfall::core::rng::next_seed;
///
/// let (seed, value) = next_seed(42);
/// assert_eq!(value, 1083814273); // Always the same!
/// assert_eq!(seed, value);
/// ```
#[inline]
pub fn next_seed(seed: u32) -> (u32, u32) {
    let next = seed.wrapping_mul(LCG_MUL).wrapping_add(LCG_INC);
    (next, next)
}

/// Draw an integer in `[lo, hi]`, inclusive on both ends.
///
/// Requires `lo <= hi` (debug-asserted). Uses a simple modulo fold;
/// the slight bias is irrelevant for the small spans the game draws.
#[inline]
pub fn rand_range(seed: u32, lo: i32, hi: i32) -> (u32, i32) {
    debug_assert!(lo <= hi, "rand_range requires lo <= hi ({lo} > {hi})");
    let (next, raw) = next_seed(seed);
    let span = (hi as i64) - (lo as i64) + 1;
    let value = (lo as i64) + (raw as i64).rem_euclid(span);
    (next, value as i32)
}

// =============================================================================
// TESTS
// =============================================================================
