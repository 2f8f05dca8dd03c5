//! Render Module
//!
//! wgpu glue for the meadow: device setup, the uniform block shared by the
//! grass and ground shaders, the cloud color texture and the draw pass.

pub mod cloud_texture;
pub mod gpu_context;
pub mod meadow_pass;
pub mod uniforms;

pub use cloud_texture::{CLOUD_TEXTURE_SIZE, CloudImage, CloudTexture};
pub use gpu_context::{DEPTH_FORMAT, GpuContext, GpuContextConfig, choose_surface_format};
pub use meadow_pass::{MeadowRenderer, MeshBuffer};
pub use uniforms::GrassUniforms;
