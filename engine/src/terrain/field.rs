//! Terrain Height Field
//!
//! Rolling hills shared by the grass blades and the ground grid. Both
//! builders sample the same field so blade roots sit on the ground surface.

use glam::Vec3;
use noise::{NoiseFn, Simplex};

use crate::config::TerrainConfig;

/// Central-difference step used for surface normals.
pub const NORMAL_EPSILON: f32 = 0.1;

/// A deterministic elevation function over the XZ plane.
pub trait HeightField {
    /// Ground elevation at `(x, z)`.
    fn height(&self, x: f32, z: f32) -> f32;

    /// Unit surface normal at `(x, z)`, pointing up (+Y side).
    fn normal(&self, x: f32, z: f32) -> Vec3 {
        let e = NORMAL_EPSILON;
        let hx = self.height(x + e, z) - self.height(x - e, z);
        let hz = self.height(x, z + e) - self.height(x, z - e);

        let tangent_x = Vec3::new(2.0 * e, hx, 0.0);
        let tangent_z = Vec3::new(0.0, hz, 2.0 * e);

        tangent_z.cross(tangent_x).try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Simplex-noise terrain: `noise(x * scale, z * scale) * amplitude`.
pub struct NoiseTerrain {
    noise: Simplex,
    scale: f32,
    amplitude: f32,
}

impl NoiseTerrain {
    pub fn new(config: &TerrainConfig) -> Self {
        Self {
            noise: Simplex::new(config.seed),
            scale: config.scale,
            amplitude: config.amplitude,
        }
    }

    pub fn amplitude(&self) -> f32 {
        self.amplitude
    }
}

impl Default for NoiseTerrain {
    fn default() -> Self {
        Self::new(&TerrainConfig::default())
    }
}

impl HeightField for NoiseTerrain {
    fn height(&self, x: f32, z: f32) -> f32 {
        let n = self
            .noise
            .get([(x * self.scale) as f64, (z * self.scale) as f64]);
        n as f32 * self.amplitude
    }
}

/// Level ground at a fixed elevation.
#[derive(Clone, Copy, Debug, Default)]
pub struct FlatTerrain {
    pub elevation: f32,
}

impl FlatTerrain {
    pub fn new(elevation: f32) -> Self {
        Self { elevation }
    }
}

impl HeightField for FlatTerrain {
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.elevation
    }

    fn normal(&self, _x: f32, _z: f32) -> Vec3 {
        Vec3::Y
    }
}

impl<T: HeightField + ?Sized> HeightField for &T {
    fn height(&self, x: f32, z: f32) -> f32 {
        (**self).height(x, z)
    }

    fn normal(&self, x: f32, z: f32) -> Vec3 {
        (**self).normal(x, z)
    }
}
