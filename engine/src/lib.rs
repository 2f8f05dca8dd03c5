//! Meadow Engine Library
//!
//! Procedural grass field on a noise height field: one-time generation of
//! blade and ground geometry, a small impact ring animated by the shaders,
//! and the wgpu plumbing to draw it.
//!
//! # Modules
//!
//! - [`terrain`] - Height fields sampled during generation
//! - [`vegetation`] - Grass blade and ground mesh builders
//! - [`impact`] - Impact ring buffer, ripple formula, falling drops
//! - [`meadow`] - Generated field plus its per-frame state
//! - [`render`] - GPU context, uniforms, cloud texture and draw pass
//! - [`camera`] - Orbit camera and terrain picking
//! - [`config`] - JSON configuration
//!
//! # Example
//!
//! ```ignore
//! use meadow_engine::{MeadowConfig, MeadowField};
//!
//! let mut field = MeadowField::generate(MeadowConfig::default());
//! field.update(1.25);
//! field.emit_impact(0.0, 0.0, 0.9);
//! let uniforms = field.uniforms(view_proj, eye, false);
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod impact;
pub mod math;
pub mod meadow;
pub mod render;
pub mod terrain;
pub mod vegetation;

pub use config::MeadowConfig;
pub use error::{MeadowError, Result};
pub use meadow::MeadowField;
pub use terrain::{FlatTerrain, HeightField, NoiseTerrain};
