//! Terrain Module
//!
//! Height fields sampled during one-time field generation.

pub mod field;

pub use field::{FlatTerrain, HeightField, NORMAL_EPSILON, NoiseTerrain};
