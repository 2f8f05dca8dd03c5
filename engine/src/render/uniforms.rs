//! Uniform Structs for GPU Shaders
//!
//! GPU-compatible uniform blocks that must match the WGSL layout exactly.

use glam::Mat4;

use crate::config::MeadowConfig;
use crate::impact::IMPACT_CAPACITY;

/// Per-frame uniforms shared by `grass.wgsl` and `ground.wgsl`.
/// Must match the WGSL struct layout exactly!
///
/// WGSL layout (256 bytes total):
///   offset   0: view_proj (mat4x4<f32>)   = 64 bytes
///   offset  64: camera_pos (vec3<f32>)    = 12 bytes
///   offset  76: time (f32)                = 4 bytes
///   offset  80: sun_color (vec3<f32>)     = 12 bytes
///   offset  92: mirror (f32)              = 4 bytes
///   offset  96: grass_color (vec3<f32>)   = 12 bytes
///   offset 108: impact_life (f32)         = 4 bytes
///   offset 112: ground_color (vec3<f32>)  = 12 bytes
///   offset 124: ripple_falloff (f32)      = 4 bytes
///   offset 128: wind (vec4<f32>)          = 16 bytes (speed, tip sway, mid sway, unused)
///   offset 144: ripple (vec4<f32>)        = 16 bytes (frequency, amplitude, unused, unused)
///   offset 160: impacts (array<vec4<f32>, 6>) = 96 bytes (x, z, start, strength)
///   Total: 256 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GrassUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    /// Seconds since the field started.
    pub time: f32,
    pub sun_color: [f32; 3],
    /// 1.0 flips blades around their root for the underside pass.
    pub mirror: f32,
    pub grass_color: [f32; 3],
    pub impact_life: f32,
    pub ground_color: [f32; 3],
    pub ripple_falloff: f32,
    pub wind: [f32; 4],
    pub ripple: [f32; 4],
    pub impacts: [[f32; 4]; IMPACT_CAPACITY],
}

static_assertions::const_assert_eq!(std::mem::size_of::<GrassUniforms>(), 256);

impl Default for GrassUniforms {
    fn default() -> Self {
        Self::from_config(&MeadowConfig::default())
    }
}

impl GrassUniforms {
    pub fn from_config(config: &MeadowConfig) -> Self {
        let visual = &config.visual;
        let ripple = &config.ripple;
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            camera_pos: [0.0, 0.0, 0.0],
            time: 0.0,
            sun_color: visual.sun_color,
            mirror: 0.0,
            grass_color: visual.grass_color,
            impact_life: ripple.lifetime,
            ground_color: visual.ground_color,
            ripple_falloff: ripple.falloff,
            wind: [visual.wind_speed, visual.tip_sway, visual.mid_sway, 0.0],
            ripple: [ripple.frequency, ripple.amplitude, 0.0, 0.0],
            impacts: [[0.0; 4]; IMPACT_CAPACITY],
        }
    }

    pub fn with_camera(mut self, view_proj: [[f32; 4]; 4], camera_pos: [f32; 3]) -> Self {
        self.view_proj = view_proj;
        self.camera_pos = camera_pos;
        self
    }

    pub fn with_time(mut self, time: f32) -> Self {
        self.time = time;
        self
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = if mirror { 1.0 } else { 0.0 };
        self
    }

    pub fn with_impacts(mut self, impacts: [[f32; 4]; IMPACT_CAPACITY]) -> Self {
        self.impacts = impacts;
        self
    }
}
