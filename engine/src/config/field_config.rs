//! Field Configuration
//!
//! Construction-time inputs for the vegetation field: terrain shape, blade
//! count, field size and ground subdivision. Nothing here changes after the
//! field is generated.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::VisualConfig;
use crate::error::Result;
use crate::impact::RippleParams;

/// Upper bound on blades; past this the index buffer alone is hundreds of MB.
pub const MAX_BLADE_COUNT: u32 = 2_000_000;

/// Upper bound on ground grid segments per side.
pub const MAX_GROUND_SEGMENTS: u32 = 1024;

/// Coherent-noise terrain parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Noise seed. Fixed per process; the field is never reseeded.
    pub seed: u32,
    /// Spatial frequency applied to world XZ before sampling.
    pub scale: f32,
    /// Peak elevation in world units.
    pub amplitude: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            scale: 0.02,
            amplitude: 3.0,
        }
    }
}

/// Shape of a single grass blade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BladeShape {
    /// Distance between the two base vertices.
    pub width: f32,
    /// Shortest blade height.
    pub base_height: f32,
    /// Extra height added by `seeded_random(index)`.
    pub height_variation: f32,
    /// Maximum forward lean of the tip.
    pub tip_offset: f32,
    /// Weight of the terrain normal when orienting blades (0 = world up).
    pub normal_blend: f32,
}

impl Default for BladeShape {
    fn default() -> Self {
        Self {
            width: 0.1,
            base_height: 0.8,
            height_variation: 0.6,
            tip_offset: 0.1,
            normal_blend: 0.5,
        }
    }
}

/// Blade scatter and ground grid parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub blade_count: u32,
    /// Diameter of the grass disk and side length of the ground square.
    pub field_size: f32,
    pub ground_segments: u32,
    /// Ground sits this far below the terrain so blade roots don't z-fight.
    pub ground_sink: f32,
    pub blade: BladeShape,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            blade_count: 100_000,
            field_size: 30.0,
            ground_segments: 64,
            ground_sink: 0.05,
            blade: BladeShape::default(),
        }
    }
}

/// Complete meadow configuration, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeadowConfig {
    pub terrain: TerrainConfig,
    pub field: FieldConfig,
    pub ripple: RippleParams,
    pub visual: VisualConfig,
}

impl MeadowConfig {
    /// Parse a config from JSON text. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: MeadowConfig = serde_json::from_str(text)?;
        Ok(config.sanitized())
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded meadow config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Load a config file, or fall back to defaults when it does not exist.
    ///
    /// A file that exists but fails to parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::warn!("Config {} not found, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp values into the ranges the builders expect.
    pub fn sanitized(mut self) -> Self {
        let field = &mut self.field;
        if field.blade_count > MAX_BLADE_COUNT {
            log::warn!(
                "blade_count {} exceeds {}, clamping",
                field.blade_count,
                MAX_BLADE_COUNT
            );
            field.blade_count = MAX_BLADE_COUNT;
        }
        field.ground_segments = field.ground_segments.clamp(1, MAX_GROUND_SEGMENTS);
        field.field_size = non_negative(field.field_size);
        field.ground_sink = non_negative(field.ground_sink);

        let blade = &mut field.blade;
        blade.width = non_negative(blade.width);
        blade.base_height = non_negative(blade.base_height);
        blade.height_variation = non_negative(blade.height_variation);
        blade.tip_offset = non_negative(blade.tip_offset);
        blade.normal_blend = if blade.normal_blend.is_finite() {
            blade.normal_blend.clamp(0.0, 1.0)
        } else {
            0.5
        };

        self.ripple.lifetime = self.ripple.lifetime.max(0.01);
        self
    }
}

fn non_negative(v: f32) -> f32 {
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}
