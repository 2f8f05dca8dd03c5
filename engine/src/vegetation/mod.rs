//! Vegetation Module
//!
//! Static geometry for the meadow: grass blades and the ground they grow on.

pub mod grass_blades;
pub mod ground;

pub use grass_blades::{
    BLADE_INDEX_COUNT, BLADE_INDICES, BLADE_VERTEX_COUNT, BladeInstance, BladeVertex,
    GrassGeometry, GrassVertex, compute_vertex_normals, disk_sample,
};
pub use ground::{GroundMesh, GroundVertex};
