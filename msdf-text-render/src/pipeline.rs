//! GPU pipeline creation for MSDF text.
//!
//! One bind group carries the uniforms, the atlas texture and its sampler;
//! the pipeline draws [`Vertex`] triangle lists from a
//! [`VertexBatch`](crate::VertexBatch) with standard alpha blending.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;
use wgpu::*;

use crate::texture::AtlasTexture;
use crate::vertex::Vertex;

/// Uniform block of `msdf_text.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct TextUniforms {
    pub projection: [[f32; 4]; 4],
    /// x: distance range in atlas pixels, yzw unused
    pub params: [f32; 4],
}

impl TextUniforms {
    pub fn new(projection: Mat4, pixel_range: f32) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            params: [pixel_range, 0.0, 0.0, 0.0],
        }
    }
}

/// Projection mapping pixel coordinates (origin top-left, y down) to clip space
pub fn screen_projection(width: f32, height: f32) -> Mat4 {
    Mat4::orthographic_rh(0.0, width, height, 0.0, -1.0, 1.0)
}

/// Create the uniform buffer, initialised with `uniforms`
pub fn create_uniform_buffer(device: &Device, uniforms: &TextUniforms) -> Buffer {
    device.create_buffer_init(&util::BufferInitDescriptor {
        label: Some("msdf text uniforms"),
        contents: bytemuck::bytes_of(uniforms),
        usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
    })
}

/// Create the text bind group layout
pub fn create_text_bind_group_layout(device: &Device) -> BindGroupLayout {
    device.create_bind_group_layout(&BindGroupLayoutDescriptor {
        label: Some("msdf text bind group layout"),
        entries: &[
            BindGroupLayoutEntry {
                binding: 0,
                visibility: ShaderStages::VERTEX_FRAGMENT,
                ty: BindingType::Buffer {
                    ty: BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 1,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Texture {
                    sample_type: TextureSampleType::Float { filterable: true },
                    view_dimension: TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            BindGroupLayoutEntry {
                binding: 2,
                visibility: ShaderStages::FRAGMENT,
                ty: BindingType::Sampler(SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Create the text bind group
pub fn create_text_bind_group(
    device: &Device,
    layout: &BindGroupLayout,
    uniforms: &Buffer,
    atlas: &AtlasTexture,
) -> BindGroup {
    device.create_bind_group(&BindGroupDescriptor {
        label: Some("msdf text bind group"),
        layout,
        entries: &[
            BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            },
            BindGroupEntry {
                binding: 1,
                resource: BindingResource::TextureView(&atlas.view),
            },
            BindGroupEntry {
                binding: 2,
                resource: BindingResource::Sampler(&atlas.sampler),
            },
        ],
    })
}

/// Create the text pipeline for MSDF glyph rendering
pub fn create_text_pipeline(
    device: &Device,
    surface_format: TextureFormat,
    bind_group_layout: &BindGroupLayout,
) -> RenderPipeline {
    let shader = device.create_shader_module(include_wgsl!("shaders/msdf_text.wgsl"));

    let pipeline_layout = device.create_pipeline_layout(&PipelineLayoutDescriptor {
        label: Some("msdf text pipeline layout"),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&RenderPipelineDescriptor {
        label: Some("msdf text pipeline"),
        layout: Some(&pipeline_layout),
        vertex: VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },
        fragment: Some(FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            compilation_options: Default::default(),
            targets: &[Some(ColorTargetState {
                format: surface_format,
                blend: Some(BlendState::ALPHA_BLENDING),
                write_mask: ColorWrites::ALL,
            })],
        }),
        primitive: PrimitiveState {
            topology: PrimitiveTopology::TriangleList,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
