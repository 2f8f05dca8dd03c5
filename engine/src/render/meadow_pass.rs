//! Meadow Render Pass
//!
//! Draws the ground grid and the grass field. The grass buffers are uploaded
//! once; each frame only the two uniform blocks (top and mirrored pass) are
//! rewritten.

use super::cloud_texture::{CloudImage, CloudTexture};
use super::gpu_context::{
    DEPTH_FORMAT, GpuContext, create_index_buffer, create_uniform_buffer, create_vertex_buffer,
};
use super::uniforms::GrassUniforms;
use crate::vegetation::{GrassGeometry, GrassVertex, GroundMesh, GroundVertex};

const GRASS_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
    2 => Float32x2, // uv
    3 => Float32,   // vert_index
    4 => Float32,   // blade_center_y
];

const GROUND_ATTRIBUTES: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
    0 => Float32x3, // position
    1 => Float32x3, // normal
    2 => Float32x2, // uv
];

/// A static mesh on the GPU
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count > 0 {
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.index_count, 0, 0..1);
        }
    }
}

/// Uniform buffer plus the bind group exposing it at group 0.
struct UniformSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

pub struct MeadowRenderer {
    grass_pipeline: wgpu::RenderPipeline,
    ground_pipeline: wgpu::RenderPipeline,
    top: UniformSlot,
    mirror: UniformSlot,
    grass: MeshBuffer,
    ground: MeshBuffer,
    cloud: CloudTexture,
    pub draw_mirror: bool,
}

impl MeadowRenderer {
    pub fn new(
        gpu: &GpuContext,
        grass: &GrassGeometry,
        ground: &GroundMesh,
        cloud_image: &CloudImage,
        draw_mirror: bool,
    ) -> Self {
        let device = &gpu.device;
        let cloud = CloudTexture::new(device, &gpu.queue, cloud_image);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Meadow Uniform Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<GrassUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });

        let top = create_uniform_slot(device, &uniform_layout, "Grass Top");
        let mirror = create_uniform_slot(device, &uniform_layout, "Grass Mirror");

        let grass_pipeline = create_meadow_pipeline(
            device,
            "Grass",
            include_str!("../../../shaders/grass.wgsl"),
            &[&uniform_layout, &cloud.bind_group_layout],
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GrassVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &GRASS_ATTRIBUTES,
            },
            gpu.format(),
            // Blades are single quads seen from both sides
            None,
        );

        let ground_pipeline = create_meadow_pipeline(
            device,
            "Ground",
            include_str!("../../../shaders/ground.wgsl"),
            &[&uniform_layout, &cloud.bind_group_layout],
            wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<GroundVertex>() as u64,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &GROUND_ATTRIBUTES,
            },
            gpu.format(),
            Some(wgpu::Face::Back),
        );

        let grass_vertices = grass.vertices();
        let grass = MeshBuffer {
            vertex_buffer: create_vertex_buffer(device, "Grass Vertex Buffer", &grass_vertices),
            index_buffer: create_index_buffer(device, "Grass Index Buffer", &grass.indices),
            index_count: grass.indices.len() as u32,
        };
        let ground = MeshBuffer {
            vertex_buffer: create_vertex_buffer(device, "Ground Vertex Buffer", &ground.vertices),
            index_buffer: create_index_buffer(device, "Ground Index Buffer", &ground.indices),
            index_count: ground.indices.len() as u32,
        };
        log::info!(
            "Uploaded meadow buffers: {} grass indices, {} ground indices",
            grass.index_count,
            ground.index_count
        );

        Self {
            grass_pipeline,
            ground_pipeline,
            top,
            mirror,
            grass,
            ground,
            cloud,
            draw_mirror,
        }
    }

    /// Write this frame's uniform blocks.
    pub fn update_uniforms(&self, queue: &wgpu::Queue, top: &GrassUniforms, mirror: &GrassUniforms) {
        queue.write_buffer(&self.top.buffer, 0, bytemuck::bytes_of(top));
        if self.draw_mirror {
            queue.write_buffer(&self.mirror.buffer, 0, bytemuck::bytes_of(mirror));
        }
    }

    /// Clear the target and draw ground, grass, then the mirrored grass.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        depth_view: &wgpu::TextureView,
        clear_color: wgpu::Color,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Meadow Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                depth_slice: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_bind_group(1, &self.cloud.bind_group, &[]);

        pass.set_pipeline(&self.ground_pipeline);
        pass.set_bind_group(0, &self.top.bind_group, &[]);
        self.ground.draw(&mut pass);

        pass.set_pipeline(&self.grass_pipeline);
        self.grass.draw(&mut pass);

        if self.draw_mirror {
            pass.set_bind_group(0, &self.mirror.bind_group, &[]);
            self.grass.draw(&mut pass);
        }
    }
}

fn create_uniform_slot(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    label: &str,
) -> UniformSlot {
    let buffer = create_uniform_buffer(
        device,
        &format!("{} Uniform Buffer", label),
        &GrassUniforms::default(),
    );
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} Bind Group", label)),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    });
    UniformSlot { buffer, bind_group }
}

fn create_meadow_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_source: &str,
    bind_group_layouts: &[&wgpu::BindGroupLayout],
    vertex_layout: wgpu::VertexBufferLayout<'_>,
    format: wgpu::TextureFormat,
    cull_mode: Option<wgpu::Face>,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{} Shader", label)),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(&format!("{} Pipeline Layout", label)),
        bind_group_layouts,
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{} Pipeline", label)),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: &[vertex_layout],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
