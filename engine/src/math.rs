//! Deterministic Randomness
//!
//! Blade placement is keyed off the blade index rather than a stateful
//! generator, so any blade can be regenerated in isolation.

/// Deterministic pseudo-random value in `[0, 1)`: `frac(sin(seed) * 10000)`.
///
/// Evaluated in double precision; `sin` of large integer seeds loses most of
/// its useful bits in `f32`.
pub fn seeded_random(seed: f64) -> f32 {
    let x = seed.sin() * 10000.0;
    (x - x.floor()) as f32
}

/// Linearly remap `val` from `[old_min, old_max]` to `[new_min, new_max]`.
///
/// A zero-width source range maps everything to `new_min`.
pub fn interpolate(val: f32, old_min: f32, old_max: f32, new_min: f32, new_max: f32) -> f32 {
    let span = old_max - old_min;
    if span == 0.0 {
        return new_min;
    }
    (val - old_min) * (new_max - new_min) / span + new_min
}
