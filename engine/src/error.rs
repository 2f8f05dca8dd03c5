//! Error Types
//!
//! Field generation itself never fails; everything here comes from the
//! outer layers (config files, textures, GPU setup).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeadowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("Failed to decode texture: {0}")]
    Image(#[from] image::ImageError),

    #[error("No suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to create GPU device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Surface reports no supported texture formats")]
    NoSurfaceFormat,

    #[error("Surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("Window error: {0}")]
    Window(String),
}

pub type Result<T> = std::result::Result<T, MeadowError>;
