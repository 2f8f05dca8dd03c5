//! Ground Mesh
//!
//! Flat subdivided square displaced onto the terrain, sitting slightly below
//! the blade roots.

use std::time::Instant;

use bytemuck::{Pod, Zeroable};

use super::grass_blades::compute_vertex_normals;
use crate::terrain::HeightField;

/// Ground vertex (32 bytes): position, normal, uv.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GroundVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::const_assert_eq!(std::mem::size_of::<GroundVertex>(), 32);

/// Displaced grid covering `[-size/2, size/2]` on X and Z.
#[derive(Clone, Debug, Default)]
pub struct GroundMesh {
    pub vertices: Vec<GroundVertex>,
    pub indices: Vec<u32>,
    pub size: f32,
    pub segments: u32,
    pub sink: f32,
}

impl GroundMesh {
    /// Build a `segments x segments` grid of side `size`, each vertex lowered
    /// to `terrain.height(x, z) - sink`. `segments` of 0 is treated as 1.
    pub fn build(terrain: &impl HeightField, size: f32, segments: u32, sink: f32) -> Self {
        let started = Instant::now();
        let segments = segments.max(1);
        let row = segments + 1;
        let half = size * 0.5;
        let step = size / segments as f32;

        let mut positions = Vec::with_capacity((row * row) as usize);
        let mut uvs = Vec::with_capacity((row * row) as usize);

        for iz in 0..row {
            for ix in 0..row {
                let x = -half + ix as f32 * step;
                let z = -half + iz as f32 * step;
                positions.push([x, terrain.height(x, z) - sink, z]);
                uvs.push([
                    ix as f32 / segments as f32,
                    iz as f32 / segments as f32,
                ]);
            }
        }

        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for iz in 0..segments {
            for ix in 0..segments {
                let i00 = iz * row + ix;
                let i10 = i00 + 1;
                let i01 = i00 + row;
                let i11 = i01 + 1;
                // Counter-clockwise seen from above (+Y)
                indices.extend_from_slice(&[i00, i01, i10, i10, i01, i11]);
            }
        }

        let normals = compute_vertex_normals(&positions, &indices);
        let vertices = positions
            .into_iter()
            .zip(normals)
            .zip(uvs)
            .map(|((position, normal), uv)| GroundVertex {
                position,
                normal,
                uv,
            })
            .collect::<Vec<_>>();

        log::info!(
            "Built ground grid {}x{} ({} vertices) in {:.1} ms",
            segments,
            segments,
            vertices.len(),
            started.elapsed().as_secs_f64() * 1000.0
        );

        Self {
            vertices,
            indices,
            size,
            segments,
            sink,
        }
    }

    /// Grid vertex closest to `(x, z)`, or `None` outside the grid.
    pub fn nearest_vertex(&self, x: f32, z: f32) -> Option<&GroundVertex> {
        let half = self.size * 0.5;
        if x < -half || x > half || z < -half || z > half {
            return None;
        }
        if self.size == 0.0 {
            return self.vertices.first();
        }
        let step = self.size / self.segments as f32;
        let ix = ((x + half) / step).round() as u32;
        let iz = ((z + half) / step).round() as u32;
        let row = self.segments + 1;
        self.vertices
            .get((iz.min(self.segments) * row + ix.min(self.segments)) as usize)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terrain::FlatTerrain;

    #[test]
    fn test_grid_counts() {
        let mesh = GroundMesh::build(&FlatTerrain::default(), 10.0, 4, 0.05);
        assert_eq!(mesh.vertices.len(), 25);
        assert_eq!(mesh.indices.len(), 4 * 4 * 6);
    }

    #[test]
    fn test_zero_segments_clamped() {
        let mesh = GroundMesh::build(&FlatTerrain::default(), 10.0, 0, 0.05);
        assert_eq!(mesh.segments, 1);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.triangle_count(), 2);
    }

    #[test]
    fn test_flat_ground_faces_up() {
        let mesh = GroundMesh::build(&FlatTerrain::new(2.0), 8.0, 2, 0.05);
        for v in &mesh.vertices {
            assert!((v.position[1] - 1.95).abs() < 1e-6);
            assert!((v.normal[1] - 1.0).abs() < 1e-6, "normal {:?}", v.normal);
        }
    }

    #[test]
    fn test_nearest_vertex_outside_is_none() {
        let mesh = GroundMesh::build(&FlatTerrain::default(), 10.0, 4, 0.0);
        assert!(mesh.nearest_vertex(6.0, 0.0).is_none());
        let v = mesh.nearest_vertex(2.4, -2.6).unwrap();
        assert_eq!(v.position[0], 2.5);
        assert_eq!(v.position[2], -2.5);
    }
}
