//! Config Module
//!
//! Centralized configuration for field generation and visuals.

pub mod field_config;
pub mod visual_config;

pub use field_config::{
    BladeShape, FieldConfig, MAX_BLADE_COUNT, MAX_GROUND_SEGMENTS, MeadowConfig, TerrainConfig,
};
pub use visual_config::VisualConfig;
