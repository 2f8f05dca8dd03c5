//! Cloud Color Texture
//!
//! Low-frequency texture mixed into the grass and ground color so the field
//! doesn't read as one flat green. Loaded from an image when configured,
//! otherwise generated as tileable fractal noise.

use std::f64::consts::TAU;
use std::path::Path;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use crate::error::Result;

/// Side length of the generated texture in pixels.
pub const CLOUD_TEXTURE_SIZE: u32 = 256;

const NOISE_OCTAVES: usize = 4;

/// RGBA8 pixels plus their dimensions.
#[derive(Clone, Debug, PartialEq)]
pub struct CloudImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl CloudImage {
    /// Decode an image file into RGBA8.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref())?.to_rgba8();
        let (width, height) = img.dimensions();
        log::info!(
            "Loaded cloud texture {} ({}x{})",
            path.as_ref().display(),
            width,
            height
        );
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }

    /// Tileable grayscale fractal noise, seamless on every edge.
    pub fn generate(size: u32, seed: u32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed).set_octaves(NOISE_OCTAVES);
        let size = size.max(1);
        let mut rgba = Vec::with_capacity((size * size * 4) as usize);

        // Walking a torus in 4D makes both axes wrap
        let radius = 1.2;
        for y in 0..size {
            let v = y as f64 / size as f64 * TAU;
            for x in 0..size {
                let u = x as f64 / size as f64 * TAU;
                let n = fbm.get([
                    u.cos() * radius,
                    u.sin() * radius,
                    v.cos() * radius,
                    v.sin() * radius,
                ]);
                let value = ((n * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0) as u8;
                rgba.extend_from_slice(&[value, value, value, 255]);
            }
        }

        Self {
            width: size,
            height: size,
            rgba,
        }
    }

    /// Load `path` if given, falling back to generated noise on any failure.
    pub fn load_or_generate(path: Option<&str>, seed: u32) -> Self {
        if let Some(path) = path {
            match Self::load(path) {
                Ok(img) => return img,
                Err(e) => log::warn!("Cloud texture {} unavailable ({}), generating noise", path, e),
            }
        }
        Self::generate(CLOUD_TEXTURE_SIZE, seed)
    }
}

/// Cloud texture and associated GPU resources.
pub struct CloudTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CloudTexture {
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue, image: &CloudImage) -> Self {
        let extent = wgpu::Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Cloud Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(image.width * 4),
                rows_per_image: Some(image.height),
            },
            extent,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("Cloud Texture View"),
            ..Default::default()
        });

        // Repeat addressing so the ground can tile it
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Cloud Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cloud Texture Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cloud Texture Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        Self {
            texture,
            view,
            sampler,
            bind_group,
            bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_texture_size() {
        let img = CloudImage::generate(32, 7);
        assert_eq!(img.width, 32);
        assert_eq!(img.height, 32);
        assert_eq!(img.rgba.len(), 32 * 32 * 4);
        assert!(img.rgba.chunks_exact(4).all(|p| p[3] == 255 && p[0] == p[1]));
    }

    #[test]
    fn test_generated_texture_deterministic() {
        assert_eq!(CloudImage::generate(16, 3), CloudImage::generate(16, 3));
    }

    #[test]
    fn test_missing_file_falls_back() {
        let img = CloudImage::load_or_generate(Some("/nonexistent/cloud.jpg"), 1);
        assert_eq!(img.width, CLOUD_TEXTURE_SIZE);
    }
}
