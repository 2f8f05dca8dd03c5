//! Meadow Field
//!
//! Generated geometry plus the little state the frame loop mutates: the
//! clock and the impact ring. Geometry is built once in `new` and never
//! touched again.

use std::time::Instant;

use serde::Serialize;

use crate::config::MeadowConfig;
use crate::impact::{Impact, ImpactEvent, ImpactRing};
use crate::render::uniforms::GrassUniforms;
use crate::terrain::{HeightField, NoiseTerrain};
use crate::vegetation::{GrassGeometry, GroundMesh};

/// Sizes and extents of a generated field, written next to baked buffers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldSummary {
    pub blade_count: usize,
    pub grass_vertices: usize,
    pub grass_indices: usize,
    pub ground_vertices: usize,
    pub ground_indices: usize,
    /// Lowest and highest grass vertex height.
    pub grass_height_range: [f32; 2],
    /// Lowest and highest ground vertex height.
    pub ground_height_range: [f32; 2],
    pub config: MeadowConfig,
}

pub struct MeadowField<T: HeightField = NoiseTerrain> {
    pub config: MeadowConfig,
    pub terrain: T,
    pub grass: GrassGeometry,
    pub ground: GroundMesh,
    impacts: ImpactRing,
    elapsed: f32,
}

impl MeadowField<NoiseTerrain> {
    /// Build the field on the simplex terrain described by `config`.
    pub fn generate(config: MeadowConfig) -> Self {
        let terrain = NoiseTerrain::new(&config.terrain);
        Self::with_terrain(config, terrain)
    }
}

impl<T: HeightField> MeadowField<T> {
    /// Build the field on an arbitrary height field. Out-of-range config
    /// values are clamped first, same as a config loaded from disk.
    pub fn with_terrain(config: MeadowConfig, terrain: T) -> Self {
        let config = config.sanitized();
        let started = Instant::now();
        let field = &config.field;
        let grass = GrassGeometry::build(
            &terrain,
            field.blade_count,
            field.field_size,
            &field.blade,
        );
        let ground = GroundMesh::build(
            &terrain,
            field.field_size,
            field.ground_segments,
            field.ground_sink,
        );
        log::info!(
            "Meadow generated in {:.1} ms",
            started.elapsed().as_secs_f64() * 1000.0
        );

        Self {
            config,
            terrain,
            grass,
            ground,
            impacts: ImpactRing::new(),
            elapsed: 0.0,
        }
    }

    /// Advance the field clock to `elapsed` seconds since start.
    pub fn update(&mut self, elapsed: f32) {
        self.elapsed = elapsed;
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Record a ground contact at the current field time.
    pub fn emit_impact(&mut self, x: f32, z: f32, strength: f32) {
        self.impacts.emit(x, z, strength, self.elapsed);
    }

    pub fn handle_event(&mut self, event: ImpactEvent) {
        self.emit_impact(event.x, event.z, event.strength);
    }

    pub fn impacts(&self) -> &ImpactRing {
        &self.impacts
    }

    /// Impacts whose ripple is still visible.
    pub fn live_impacts(&self) -> Vec<Impact> {
        self.impacts.live(self.elapsed, self.config.ripple.lifetime)
    }

    pub fn summary(&self) -> FieldSummary {
        FieldSummary {
            blade_count: self.grass.blade_count(),
            grass_vertices: self.grass.vertex_count(),
            grass_indices: self.grass.indices.len(),
            ground_vertices: self.ground.vertices.len(),
            ground_indices: self.ground.indices.len(),
            grass_height_range: height_range(self.grass.positions.iter()),
            ground_height_range: height_range(self.ground.vertices.iter().map(|v| &v.position)),
            config: self.config.clone(),
        }
    }

    /// Uniform block for this frame. `mirror` selects the underside pass.
    pub fn uniforms(&self, view_proj: [[f32; 4]; 4], camera_pos: [f32; 3], mirror: bool) -> GrassUniforms {
        GrassUniforms::from_config(&self.config)
            .with_camera(view_proj, camera_pos)
            .with_time(self.elapsed)
            .with_mirror(mirror)
            .with_impacts(self.impacts.as_uniform_array())
    }
}

/// `[min, max]` of the Y components, `[0, 0]` when empty.
fn height_range<'a>(positions: impl Iterator<Item = &'a [f32; 3]>) -> [f32; 2] {
    positions
        .map(|p| p[1])
        .fold(None, |acc: Option<[f32; 2]>, y| match acc {
            Some([lo, hi]) => Some([lo.min(y), hi.max(y)]),
            None => Some([y, y]),
        })
        .unwrap_or([0.0, 0.0])
}
