//! Ripple Displacement
//!
//! CPU mirror of the per-vertex ripple in `shaders/grass.wgsl`. The renderer
//! never calls this per vertex; it exists for picking, tests and debugging.

use serde::{Deserialize, Serialize};

use super::ring::Impact;

/// Strength below which an impact is ignored (matches the shader).
pub const MIN_RIPPLE_STRENGTH: f32 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RippleParams {
    /// Seconds until a ripple has fully decayed.
    pub lifetime: f32,
    /// Exponential falloff per world unit of distance.
    pub falloff: f32,
    /// Oscillation rate in radians per second.
    pub frequency: f32,
    /// Peak vertical displacement at strength 1.
    pub amplitude: f32,
}

impl Default for RippleParams {
    fn default() -> Self {
        Self {
            lifetime: 2.5,
            falloff: 1.5,
            // Two full oscillations per second
            frequency: 4.0 * std::f32::consts::PI,
            amplitude: 0.6,
        }
    }
}

/// Vertical displacement caused by `impact` at `(px, pz)` at time `now`.
///
/// `strength * max(0, 1 - dt/lifetime) * exp(-dist * falloff) * sin(dt * frequency) * amplitude`
pub fn ripple_displacement(impact: &Impact, px: f32, pz: f32, now: f32, params: &RippleParams) -> f32 {
    if impact.strength <= MIN_RIPPLE_STRENGTH {
        return 0.0;
    }
    let dt = impact.age(now);
    if dt < 0.0 {
        return 0.0;
    }

    let dist = ((px - impact.x).powi(2) + (pz - impact.z).powi(2)).sqrt();
    let life = (1.0 - dt / params.lifetime).max(0.0);
    let decay = (-dist * params.falloff).exp();
    let wave = (dt * params.frequency).sin() * params.amplitude;

    impact.strength * life * decay * wave
}

/// Summed displacement from every impact in `impacts`.
pub fn total_displacement<'a>(
    impacts: impl IntoIterator<Item = &'a Impact>,
    px: f32,
    pz: f32,
    now: f32,
    params: &RippleParams,
) -> f32 {
    impacts
        .into_iter()
        .map(|imp| ripple_displacement(imp, px, pz, now, params))
        .sum()
}
