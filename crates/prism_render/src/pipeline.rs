//! Render pipeline creation for each pass kind.

use crate::texture::DEPTH_FORMAT;
use crate::wgpu;

fn layout(
    device: &wgpu::Device,
    label: &str,
    layouts: &[&wgpu::BindGroupLayout],
) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: layouts,
        push_constant_ranges: &[],
    })
}

fn multisample(sample_count: u32) -> wgpu::MultisampleState {
    wgpu::MultisampleState {
        count: sample_count,
        ..Default::default()
    }
}

/// Depth-only pipeline: vertex stage writes depth, no fragment stage.
pub fn create_depth_pipeline(
    device: &wgpu::Device,
    layouts: &[&wgpu::BindGroupLayout],
    vs: &wgpu::ShaderModule,
    stride: u64,
    attributes: &[wgpu::VertexAttribute],
    sample_count: u32,
) -> wgpu::RenderPipeline {
    let pipeline_layout = layout(device, "depth_pipeline_layout", layouts);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("depth_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vs,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            }],
            compilation_options: Default::default(),
        },
        fragment: None,
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: multisample(sample_count),
        multiview: None,
        cache: None,
    })
}

/// Lit geometry pipeline. Depth writes stay off; the prepass already
/// produced the depth buffer and this pass tests equal-or-closer.
pub fn create_pbr_pipeline(
    device: &wgpu::Device,
    layouts: &[&wgpu::BindGroupLayout],
    vs: &wgpu::ShaderModule,
    fs: &wgpu::ShaderModule,
    stride: u64,
    attributes: &[wgpu::VertexAttribute],
    target_format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::RenderPipeline {
    let pipeline_layout = layout(device, "pbr_pipeline_layout", layouts);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("pbr_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vs,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fs,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: multisample(sample_count),
        multiview: None,
        cache: None,
    })
}

/// Skybox pipeline. Vertices land exactly at the far plane, so the
/// compare must be LessEqual against the cleared 1.0 depth.
pub fn create_skybox_pipeline(
    device: &wgpu::Device,
    layouts: &[&wgpu::BindGroupLayout],
    vs: &wgpu::ShaderModule,
    fs: &wgpu::ShaderModule,
    stride: u64,
    attributes: &[wgpu::VertexAttribute],
    target_format: wgpu::TextureFormat,
    sample_count: u32,
) -> wgpu::RenderPipeline {
    let pipeline_layout = layout(device, "skybox_pipeline_layout", layouts);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("skybox_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vs,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fs,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            // Viewed from inside the cube.
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: false,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: multisample(sample_count),
        multiview: None,
        cache: None,
    })
}

/// Pipeline for rendering equirectangular samples onto one cube face.
/// No depth, always single-sample.
pub fn create_bake_pipeline(
    device: &wgpu::Device,
    layouts: &[&wgpu::BindGroupLayout],
    vs: &wgpu::ShaderModule,
    fs: &wgpu::ShaderModule,
    stride: u64,
    attributes: &[wgpu::VertexAttribute],
    target_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = layout(device, "bake_pipeline_layout", layouts);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("bake_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vs,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fs,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: target_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// Fullscreen quad onto the swapchain surface.
pub fn create_blit_pipeline(
    device: &wgpu::Device,
    layouts: &[&wgpu::BindGroupLayout],
    vs: &wgpu::ShaderModule,
    fs: &wgpu::ShaderModule,
    stride: u64,
    attributes: &[wgpu::VertexAttribute],
    surface_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let pipeline_layout = layout(device, "blit_pipeline_layout", layouts);
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("blit_pipeline"),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: vs,
            entry_point: "vs_main",
            buffers: &[wgpu::VertexBufferLayout {
                array_stride: stride,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes,
            }],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: fs,
            entry_point: "fs_main",
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}
