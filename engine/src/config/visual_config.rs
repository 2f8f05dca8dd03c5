//! Visual Configuration
//!
//! Sunset look of the meadow: sun tint, base grass color, sky clear color and
//! the optional cloud texture used to break up the grass color.

use serde::{Deserialize, Serialize};

/// Visual settings consumed by the grass and ground shaders.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Warm sunset tint (linear RGB). Taller blades catch more of it.
    pub sun_color: [f32; 3],
    /// Base blade color before cloud mixing.
    pub grass_color: [f32; 3],
    /// Ground color under the blades.
    pub ground_color: [f32; 3],
    /// Background clear color.
    pub clear_color: [f64; 3],
    /// Wind sway speed (radians per second of the sway sine).
    pub wind_speed: f32,
    /// Sway amplitude at the tip vertex.
    pub tip_sway: f32,
    /// Sway amplitude at the mid vertices.
    pub mid_sway: f32,
    /// Image to sample for color variation. A generated noise texture is
    /// used when unset or unreadable.
    pub cloud_texture: Option<String>,
    /// Draw the mirrored underside pass.
    pub draw_mirror: bool,
    pub vsync: bool,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            // 0xffb86b
            sun_color: [1.0, 0.722, 0.42],
            grass_color: [0.2, 0.6, 0.3],
            ground_color: [0.09, 0.2, 0.08],
            clear_color: [0.96, 0.72, 0.55],
            wind_speed: 2.0,
            tip_sway: 0.3,
            mid_sway: 0.1,
            cloud_texture: None,
            draw_mirror: true,
            vsync: true,
        }
    }
}
