//! Grass Blade Geometry
//!
//! Scatters blades uniformly over a disk, stands each one on the terrain and
//! flattens the whole field into one static vertex/index buffer.
//!
//! Every blade is 5 vertices and 3 triangles:
//!
//! ```text
//!          4            tip
//!         / \
//!        3---2          mid-left, mid-right (half height, narrower)
//!        |  /|
//!        | / |
//!        0---1          base-left, base-right (on the ground)
//! ```
//!
//! All per-blade randomness comes from `seeded_random(index + k)`, so the
//! same `(count, diameter)` always reproduces the same field.

use std::f32::consts::TAU;
use std::time::Instant;

use bytemuck::{Pod, Zeroable};
use glam::{Quat, Vec3};

use crate::config::BladeShape;
use crate::math::{interpolate, seeded_random};
use crate::terrain::HeightField;

/// Vertices per blade.
pub const BLADE_VERTEX_COUNT: usize = 5;

/// Indices per blade.
pub const BLADE_INDEX_COUNT: usize = 9;

/// Triangle pattern of one blade, relative to its first vertex.
pub const BLADE_INDICES: [u32; BLADE_INDEX_COUNT] = [0, 1, 2, 2, 4, 3, 3, 0, 2];

/// Role of a vertex within its blade. Stored as `vert_index` for the shader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BladeVertex {
    BaseLeft = 0,
    BaseRight = 1,
    MidRight = 2,
    MidLeft = 3,
    Tip = 4,
}

impl BladeVertex {
    pub const ALL: [BladeVertex; BLADE_VERTEX_COUNT] = [
        BladeVertex::BaseLeft,
        BladeVertex::BaseRight,
        BladeVertex::MidRight,
        BladeVertex::MidLeft,
        BladeVertex::Tip,
    ];

    /// Base vertices are pinned to the ground; the shader never sways them.
    pub fn is_base(self) -> bool {
        matches!(self, BladeVertex::BaseLeft | BladeVertex::BaseRight)
    }
}

/// Interleaved grass vertex as uploaded to the GPU.
///
/// Layout (40 bytes):
///   offset  0: position (vec3<f32>)
///   offset 12: normal (vec3<f32>)
///   offset 24: uv (vec2<f32>)
///   offset 32: vert_index (f32)
///   offset 36: blade_center_y (f32)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GrassVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub vert_index: f32,
    pub blade_center_y: f32,
}

static_assertions::const_assert_eq!(std::mem::size_of::<GrassVertex>(), 40);

/// One blade before it is flattened into the buffers.
#[derive(Clone, Copy, Debug)]
pub struct BladeInstance {
    pub index: u32,
    /// Root position on the terrain surface.
    pub center: Vec3,
    pub height: f32,
    pub yaw: f32,
    /// Forward lean of the tip.
    pub bend: f32,
    /// World-up blended with the terrain normal.
    pub up: Vec3,
    pub orientation: Quat,
}

impl BladeInstance {
    /// Derive blade `index` for a disk of radius `radius` centered at the origin.
    pub fn new(terrain: &impl HeightField, index: u32, radius: f32, shape: &BladeShape) -> Self {
        let seed = index as f64;
        let height = shape.base_height + seeded_random(seed) * shape.height_variation;
        let yaw = seeded_random(seed + 1.0) * TAU;
        let bend = seeded_random(seed + 2.0) * shape.tip_offset;

        let (x, z) = disk_sample(index, radius);
        let center = Vec3::new(x, terrain.height(x, z), z);
        let normal = terrain.normal(x, z);

        let up = Vec3::Y
            .lerp(normal, shape.normal_blend)
            .try_normalize()
            .unwrap_or(Vec3::Y);
        let orientation = Quat::from_axis_angle(up, yaw) * Quat::from_rotation_arc(Vec3::Y, up);

        Self {
            index,
            center,
            height,
            yaw,
            bend,
            up,
            orientation,
        }
    }

    /// Blade-space vertices in `BladeVertex` order. Forward is -Z.
    pub fn local_vertices(&self, width: f32) -> [Vec3; BLADE_VERTEX_COUNT] {
        let half = width * 0.5;
        let quarter = width * 0.25;
        let mid_y = self.height * 0.5;
        [
            Vec3::new(half, 0.0, 0.0),
            Vec3::new(-half, 0.0, 0.0),
            Vec3::new(-quarter, mid_y, -self.bend * 0.5),
            Vec3::new(quarter, mid_y, -self.bend * 0.5),
            Vec3::new(0.0, self.height, -self.bend),
        ]
    }

    /// World-space vertices in `BladeVertex` order.
    pub fn world_vertices(&self, width: f32) -> [Vec3; BLADE_VERTEX_COUNT] {
        self.local_vertices(width)
            .map(|v| self.orientation * v + self.center)
    }
}

/// Uniform point in a disk: `r = R * sqrt(u)`, `theta = 2pi * v`.
///
/// The square root keeps the areal density constant; without it half the
/// blades land inside the inner quarter of the area.
pub fn disk_sample(index: u32, radius: f32) -> (f32, f32) {
    let seed = index as f64;
    let r = radius * seeded_random(seed + 3.0).sqrt();
    let theta = seeded_random(seed + 4.0) * TAU;
    (r * theta.cos(), r * theta.sin())
}

/// Flattened blade field, ready for upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GrassGeometry {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub vert_indices: Vec<f32>,
    pub blade_center_ys: Vec<f32>,
    pub indices: Vec<u32>,
}

impl GrassGeometry {
    /// Build `blade_count` blades over a disk of diameter `field_diameter`.
    pub fn build(
        terrain: &impl HeightField,
        blade_count: u32,
        field_diameter: f32,
        shape: &BladeShape,
    ) -> Self {
        let started = Instant::now();
        let n = blade_count as usize;
        let radius = field_diameter * 0.5;

        let mut geometry = Self {
            positions: Vec::with_capacity(n * BLADE_VERTEX_COUNT),
            normals: Vec::new(),
            uvs: Vec::with_capacity(n * BLADE_VERTEX_COUNT),
            vert_indices: Vec::with_capacity(n * BLADE_VERTEX_COUNT),
            blade_center_ys: Vec::with_capacity(n * BLADE_VERTEX_COUNT),
            indices: Vec::with_capacity(n * BLADE_INDEX_COUNT),
        };

        for i in 0..blade_count {
            let blade = BladeInstance::new(terrain, i, radius, shape);
            geometry.push_blade(&blade, shape.width, radius);
        }
        geometry.normals = compute_vertex_normals(&geometry.positions, &geometry.indices);

        log::info!(
            "Built {} grass blades ({} vertices, {} indices) in {:.1} ms",
            blade_count,
            geometry.positions.len(),
            geometry.indices.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );
        geometry
    }

    fn push_blade(&mut self, blade: &BladeInstance, width: f32, radius: f32) {
        let base = self.positions.len() as u32;

        let u = interpolate(blade.center.x, -radius, radius, 0.0, 1.0);
        let v = interpolate(blade.center.z, -radius, radius, 0.0, 1.0);

        for (role, p) in BladeVertex::ALL.iter().zip(blade.world_vertices(width)) {
            self.positions.push(p.to_array());
            self.uvs.push([u, v]);
            self.vert_indices.push(*role as u32 as f32);
            self.blade_center_ys.push(blade.center.y);
        }

        self.indices.extend(BLADE_INDICES.iter().map(|i| base + i));
    }

    pub fn blade_count(&self) -> usize {
        self.positions.len() / BLADE_VERTEX_COUNT
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleave the attribute streams into GPU vertices.
    pub fn vertices(&self) -> Vec<GrassVertex> {
        (0..self.positions.len())
            .map(|i| GrassVertex {
                position: self.positions[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
                uv: self.uvs[i],
                vert_index: self.vert_indices[i],
                blade_center_y: self.blade_center_ys[i],
            })
            .collect()
    }

    /// Positions as a flat float stream (3 floats per vertex).
    pub fn flat_positions(&self) -> &[f32] {
        bytemuck::cast_slice(&self.positions)
    }

    /// CPU copy of the field flipped upside down around each blade root.
    ///
    /// The renderer normally does this in the vertex shader with the mirror
    /// flag; this is for targets that draw a second buffer instead.
    pub fn mirrored(&self) -> Self {
        let positions = self
            .positions
            .iter()
            .zip(&self.blade_center_ys)
            .map(|(p, &cy)| [p[0], cy - (p[1] - cy), p[2]])
            .collect();
        let normals = self.normals.iter().map(|n| [-n[0], -n[1], -n[2]]).collect();
        let indices = self
            .indices
            .chunks_exact(3)
            .flat_map(|t| [t[0], t[2], t[1]])
            .collect();

        Self {
            positions,
            normals,
            uvs: self.uvs.clone(),
            vert_indices: self.vert_indices.clone(),
            blade_center_ys: self.blade_center_ys.clone(),
            indices,
        }
    }
}

/// Smooth per-vertex normals: area-weighted sum of adjacent face normals.
pub fn compute_vertex_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from_array(positions[a]);
        let pb = Vec3::from_array(positions[b]);
        let pc = Vec3::from_array(positions[c]);
        let face = (pb - pa).cross(pc - pa);
        acc[a] += face;
        acc[b] += face;
        acc[c] += face;
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;

    #[test]
    fn test_zero_blades_is_empty() {
        let geo = GrassGeometry::build(&FlatTerrain::default(), 0, 30.0, &BladeShape::default());
        assert!(geo.is_empty());
        assert!(geo.indices.is_empty());
        assert!(geo.vertices().is_empty());
    }

    #[test]
    fn test_zero_diameter_stacks_blades_at_origin() {
        let geo = GrassGeometry::build(&FlatTerrain::default(), 4, 0.0, &BladeShape::default());
        assert_eq!(geo.vertex_count(), 20);
        for uv in &geo.uvs {
            assert_eq!(*uv, [0.0, 0.0]);
        }
        for p in geo.flat_positions() {
            assert!(p.is_finite());
        }
    }

    #[test]
    fn test_vert_index_roles() {
        let geo = GrassGeometry::build(&FlatTerrain::default(), 3, 10.0, &BladeShape::default());
        let expected: Vec<f32> = (0..3).flat_map(|_| [0.0, 1.0, 2.0, 3.0, 4.0]).collect();
        assert_eq!(geo.vert_indices, expected);
    }

    #[test]
    fn test_mirrored_flips_around_root() {
        let terrain = FlatTerrain::new(1.0);
        let geo = GrassGeometry::build(&terrain, 2, 10.0, &BladeShape::default());
        let mirror = geo.mirrored();
        for (p, m) in geo.positions.iter().zip(&mirror.positions) {
            assert!((p[1] - 1.0 + (m[1] - 1.0)).abs() < 1e-5);
            assert_eq!(p[0], m[0]);
            assert_eq!(p[2], m[2]);
        }
        assert_eq!(mirror.indices[..3], [0, 2, 1]);
    }

    #[test]
    fn test_base_vertices_flagged() {
        assert!(BladeVertex::BaseLeft.is_base());
        assert!(BladeVertex::BaseRight.is_base());
        assert!(!BladeVertex::Tip.is_base());
    }
}
