//! Render pipelines of the GPU canvas.

use super::batch::{FillInstance, StrokeVertex};
use super::shaders;

/// Format of the offscreen canvas. Linear, like a 2D canvas backing store.
pub const CANVAS_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

// Offsets follow `FillInstance`, including the padding before `colors`.
const FILL_ATTRIBUTES: [wgpu::VertexAttribute; 10] = [
    attr(0, 0, wgpu::VertexFormat::Float32x2),
    attr(1, 8, wgpu::VertexFormat::Float32x2),
    attr(2, 16, wgpu::VertexFormat::Float32x2),
    attr(3, 24, wgpu::VertexFormat::Float32x2),
    attr(4, 32, wgpu::VertexFormat::Float32x4),
    attr(5, 48, wgpu::VertexFormat::Uint32),
    attr(6, 64, wgpu::VertexFormat::Float32x4),
    attr(7, 80, wgpu::VertexFormat::Float32x4),
    attr(8, 96, wgpu::VertexFormat::Float32x4),
    attr(9, 112, wgpu::VertexFormat::Float32x4),
];

const fn attr(
    shader_location: u32,
    offset: wgpu::BufferAddress,
    format: wgpu::VertexFormat,
) -> wgpu::VertexAttribute {
    wgpu::VertexAttribute {
        format,
        offset,
        shader_location,
    }
}

const STROKE_ATTRIBUTES: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
    0 => Float32x2,
    1 => Float32x4,
];

/// Bind group layout holding the viewport uniform (group 0 of every pipeline).
pub fn viewport_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Viewport Bind Group Layout"),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

/// Pipeline for gradient-filled rectangles and circles (instanced quads).
pub fn create_fill_pipeline(
    device: &wgpu::Device,
    viewport_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Fill Shader"),
        source: wgpu::ShaderSource::Wgsl(shaders::fill_shader().into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Fill Pipeline Layout"),
        bind_group_layouts: &[viewport_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Fill Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_fill"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<FillInstance>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Instance,
                attributes: &FILL_ATTRIBUTES,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_fill"),
            targets: &[Some(wgpu::ColorTargetState {
                format: CANVAS_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Pipeline for CPU-expanded line quads.
pub fn create_stroke_pipeline(
    device: &wgpu::Device,
    viewport_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Stroke Shader"),
        source: wgpu::ShaderSource::Wgsl(shaders::stroke_shader().into()),
    });

    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Stroke Pipeline Layout"),
        bind_group_layouts: &[viewport_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("Stroke Pipeline"),
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_stroke"),
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: std::mem::size_of::<StrokeVertex>() as wgpu::BufferAddress,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: &STROKE_ATTRIBUTES,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_stroke"),
            targets: &[Some(wgpu::ColorTargetState {
                format: CANVAS_FORMAT,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
