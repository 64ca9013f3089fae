//! The renderer session: device, surface, pipelines, and frame state.
//!
//! One `Gfx` exists per window. Construction is explicit and fallible;
//! every operation afterwards borrows the session, so use-after-end is
//! unrepresentable. A process-wide guard asserts against a second
//! concurrent session.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::{Mat4, Vec3};
use log::info;

use crate::error::InitError;
use crate::framebuffer::{DepthSpec, Framebuffer, FramebufferDesc};
use crate::geometry::{IndexedGeometry, PositionVertex, QuadVertex, Vertex};
use crate::model::{self, GpuModel, Model};
use crate::pipeline;
use crate::shader::UniformTable;
use crate::shaders;
use crate::texture::{self, FilterMode, Texture, WrapMode};
use crate::uniforms::{GlobalUniforms, MaterialUniforms, ObjectUniforms};
use crate::winit::{dpi::PhysicalSize, window::Window};
use crate::wgpu;

static SESSION_LIVE: AtomicBool = AtomicBool::new(false);

/// Offscreen scene color format. The surface keeps whatever sRGB format
/// the adapter prefers; the blit pass bridges the two.
pub const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

#[derive(Debug, Clone)]
pub struct GfxConfig {
    pub vsync: bool,
    pub fovy_degrees: f32,
    pub near_clip: f32,
    pub far_clip: f32,
    /// 1 or 4.
    pub sample_count: u32,
}

impl Default for GfxConfig {
    fn default() -> Self {
        Self {
            vsync: true,
            fovy_degrees: 60.0,
            near_clip: 0.1,
            far_clip: 100.0,
            sample_count: 1,
        }
    }
}

pub struct Gfx<'w> {
    pub(crate) surface: wgpu::Surface<'w>,
    pub(crate) device: wgpu::Device,
    pub(crate) queue: wgpu::Queue,
    pub(crate) config: wgpu::SurfaceConfiguration,
    pub(crate) size: PhysicalSize<u32>,
    pub(crate) sample_count: u32,

    pub(crate) adapter_name: String,

    // Camera and clip state, pushed into the global block each frame.
    pub(crate) cam_eye: Vec3,
    pub(crate) cam_target: Vec3,
    pub(crate) fovy_degrees: f32,
    pub(crate) near_clip: f32,
    pub(crate) far_clip: f32,
    pub(crate) clear_color: wgpu::Color,

    pub(crate) globals: GlobalUniforms,
    pub(crate) global_buf: wgpu::Buffer,
    pub(crate) global_bg: wgpu::BindGroup,
    pub(crate) global_layout: wgpu::BindGroupLayout,

    pub(crate) object_uniforms: UniformTable,
    pub(crate) object_buf: wgpu::Buffer,
    pub(crate) object_bg: wgpu::BindGroup,
    pub(crate) object_layout: wgpu::BindGroupLayout,

    pub(crate) material_layout: wgpu::BindGroupLayout,
    pub(crate) skybox_layout: wgpu::BindGroupLayout,
    pub(crate) bake_uniform_layout: wgpu::BindGroupLayout,
    pub(crate) bake_tex_layout: wgpu::BindGroupLayout,
    pub(crate) blit_layout: wgpu::BindGroupLayout,

    pub(crate) depth_pipeline: wgpu::RenderPipeline,
    pub(crate) pbr_pipeline: wgpu::RenderPipeline,
    pub(crate) skybox_pipeline: wgpu::RenderPipeline,
    pub(crate) blit_pipeline: wgpu::RenderPipeline,

    // Depth prepass target owns the depth buffer; the scene target
    // shares it.
    pub(crate) depth_fb: Framebuffer,
    pub(crate) scene_fb: Framebuffer,
    pub(crate) resolve_target: Texture,
    pub(crate) blit_bg: wgpu::BindGroup,

    pub(crate) quad: IndexedGeometry,
    pub(crate) cube: IndexedGeometry,

    pub(crate) material_sampler: wgpu::Sampler,
    pub(crate) clamp_sampler: wgpu::Sampler,
    pub(crate) nearest_sampler: wgpu::Sampler,
}

impl<'w> Gfx<'w> {
    /// Bring up the whole session: surface, device, pipelines, targets.
    /// Panics if a session is already live in this process.
    pub fn start(window: &'w Window, cfg: &GfxConfig) -> Result<Self, InitError> {
        assert!(
            !SESSION_LIVE.swap(true, Ordering::SeqCst),
            "renderer session already started"
        );

        let size = window.inner_size();

        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(|e| InitError::Surface(e.to_string()))?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or(InitError::NoAdapter)?;

        let adapter_name = adapter.get_info().name.clone();
        info!("using adapter: {adapter_name}");

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| InitError::Device(e.to_string()))?;

        let caps = surface.get_capabilities(&adapter);
        let surface_format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let present = if cfg.vsync {
            wgpu::PresentMode::Fifo
        } else if caps.present_modes.contains(&wgpu::PresentMode::Mailbox) {
            wgpu::PresentMode::Mailbox
        } else {
            wgpu::PresentMode::Fifo
        };

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: present,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        assert!(
            cfg.sample_count == 1 || cfg.sample_count == 4,
            "sample count must be 1 or 4"
        );
        let sample_count = cfg.sample_count;

        // Bind group layouts.
        let global_layout = uniform_layout(
            &device,
            "global_bgl",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            GlobalUniforms::SIZE,
        );
        let object_layout = uniform_layout(
            &device,
            "object_bgl",
            wgpu::ShaderStages::VERTEX,
            ObjectUniforms::SIZE,
        );

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bgl"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2, true),
                sampler_entry(1, wgpu::SamplerBindingType::Filtering),
                texture_entry(2, wgpu::TextureViewDimension::D2, true),
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: core::num::NonZeroU64::new(
                            core::mem::size_of::<MaterialUniforms>() as u64,
                        ),
                    },
                    count: None,
                },
            ],
        });

        let skybox_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox_bgl"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::Cube, true),
                sampler_entry(1, wgpu::SamplerBindingType::Filtering),
            ],
        });

        let bake_uniform_layout = uniform_layout(
            &device,
            "bake_bgl",
            wgpu::ShaderStages::VERTEX,
            core::mem::size_of::<crate::uniforms::BakeUniforms>() as u64,
        );
        // The equirect source is 32-bit float, which is not filterable
        // without an extra device feature.
        let bake_tex_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("bake_tex_bgl"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2, false),
                sampler_entry(1, wgpu::SamplerBindingType::NonFiltering),
            ],
        });

        let blit_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("blit_bgl"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2, true),
                sampler_entry(1, wgpu::SamplerBindingType::Filtering),
            ],
        });

        // Shader modules are embedded and validated at startup; a broken
        // one is a build defect, so the panic is deliberate.
        let depth_vs = must_compile(&device, "depth", crate::error::ShaderStage::Vertex, shaders::DEPTH_VS);
        let pbr_vs = must_compile(&device, "pbr", crate::error::ShaderStage::Vertex, shaders::PBR_VS);
        let pbr_fs = must_compile(&device, "pbr", crate::error::ShaderStage::Fragment, shaders::PBR_FS);
        let sky_vs = must_compile(&device, "skybox", crate::error::ShaderStage::Vertex, shaders::SKYBOX_VS);
        let sky_fs = must_compile(&device, "skybox", crate::error::ShaderStage::Fragment, shaders::SKYBOX_FS);
        let blit_vs = must_compile(&device, "blit", crate::error::ShaderStage::Vertex, shaders::BLIT_VS);
        let blit_fs = must_compile(&device, "blit", crate::error::ShaderStage::Fragment, shaders::BLIT_FS);

        let mesh_layout = Vertex::layout();
        let mesh_attrs = mesh_layout.wgpu_attributes();
        let cube_layout = PositionVertex::layout();
        let cube_attrs = cube_layout.wgpu_attributes();
        let quad_layout = QuadVertex::layout();
        let quad_attrs = quad_layout.wgpu_attributes();

        let depth_pipeline = pipeline::create_depth_pipeline(
            &device,
            &[&global_layout, &object_layout],
            &depth_vs,
            mesh_layout.stride(),
            &mesh_attrs,
            sample_count,
        );
        let pbr_pipeline = pipeline::create_pbr_pipeline(
            &device,
            &[&global_layout, &object_layout, &material_layout],
            &pbr_vs,
            &pbr_fs,
            mesh_layout.stride(),
            &mesh_attrs,
            SCENE_FORMAT,
            sample_count,
        );
        let skybox_pipeline = pipeline::create_skybox_pipeline(
            &device,
            &[&global_layout, &skybox_layout],
            &sky_vs,
            &sky_fs,
            cube_layout.stride(),
            &cube_attrs,
            SCENE_FORMAT,
            sample_count,
        );
        let blit_pipeline = pipeline::create_blit_pipeline(
            &device,
            &[&blit_layout],
            &blit_vs,
            &blit_fs,
            quad_layout.stride(),
            &quad_attrs,
            surface_format,
        );

        // Uniform buffers and their bind groups.
        let globals = GlobalUniforms {
            clip: [
                config.width as f32,
                config.height as f32,
                cfg.near_clip,
                cfg.far_clip,
            ],
            ..Default::default()
        };
        let global_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("global_buf"),
            size: GlobalUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let global_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("global_bg"),
            layout: &global_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: global_buf.as_entire_binding(),
            }],
        });

        let object_uniforms = UniformTable::new(ObjectUniforms::SIZE as usize)
            .declare("model_to_world", ObjectUniforms::MODEL_TO_WORLD_OFFSET as usize, 64)
            .declare("normal_matrix", ObjectUniforms::NORMAL_MATRIX_OFFSET as usize, 64);
        let object_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("object_buf"),
            size: ObjectUniforms::SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("object_bg"),
            layout: &object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buf.as_entire_binding(),
            }],
        });

        // Offscreen targets.
        let depth_fb = Framebuffer::new(
            &device,
            FramebufferDesc {
                label: "depth_prepass",
                width: config.width,
                height: config.height,
                color_count: 0,
                color_format: SCENE_FORMAT,
                depth: DepthSpec::Owned,
                sample_count,
            },
        )
        .expect("depth prepass framebuffer");
        let shared_depth = Arc::clone(depth_fb.depth_attachment().expect("owned depth"));
        let scene_fb = Framebuffer::new(
            &device,
            FramebufferDesc {
                label: "scene",
                width: config.width,
                height: config.height,
                color_count: 1,
                color_format: SCENE_FORMAT,
                depth: DepthSpec::Shared(shared_depth),
                sample_count,
            },
        )
        .expect("scene framebuffer");
        let resolve_target = Texture::color_target(
            &device,
            "scene_resolve",
            config.width,
            config.height,
            SCENE_FORMAT,
            1,
        );

        let material_sampler =
            texture::create_sampler(&device, "material_sampler", WrapMode::Repeat, FilterMode::Linear);
        let clamp_sampler =
            texture::create_sampler(&device, "clamp_sampler", WrapMode::ClampToEdge, FilterMode::Linear);
        let nearest_sampler =
            texture::create_sampler(&device, "nearest_sampler", WrapMode::ClampToEdge, FilterMode::Nearest);

        let blit_bg = blit_bind_group(&device, &blit_layout, &resolve_target, &clamp_sampler);

        let quad = IndexedGeometry::upload(
            &device,
            "fullscreen_quad",
            &QUAD_VERTS,
            &[0, 1, 2, 0, 2, 3],
            wgpu::PrimitiveTopology::TriangleList,
        );
        let cube = IndexedGeometry::upload(
            &device,
            "unit_cube",
            &cube_vertices(),
            &(0..36).collect::<Vec<u32>>(),
            wgpu::PrimitiveTopology::TriangleList,
        );

        let mut gfx = Self {
            surface,
            device,
            queue,
            config,
            size,
            sample_count,
            adapter_name,
            cam_eye: Vec3::new(0.0, 0.0, 3.0),
            cam_target: Vec3::ZERO,
            fovy_degrees: cfg.fovy_degrees,
            near_clip: cfg.near_clip,
            far_clip: cfg.far_clip,
            clear_color: wgpu::Color {
                r: 0.05,
                g: 0.05,
                b: 0.08,
                a: 1.0,
            },
            globals,
            global_buf,
            global_bg,
            global_layout,
            object_uniforms,
            object_buf,
            object_bg,
            object_layout,
            material_layout,
            skybox_layout,
            bake_uniform_layout,
            bake_tex_layout,
            blit_layout,
            depth_pipeline,
            pbr_pipeline,
            skybox_pipeline,
            blit_pipeline,
            depth_fb,
            scene_fb,
            resolve_target,
            blit_bg,
            quad,
            cube,
            material_sampler,
            clamp_sampler,
            nearest_sampler,
        };
        gfx.set_model_matrix(Mat4::IDENTITY);
        gfx.write_globals();
        Ok(gfx)
    }

    /// Consume the session. Device objects drop with it; the guard
    /// clears in `Drop` so a new session may start afterwards.
    pub fn end(self) {}

    pub fn size(&self) -> PhysicalSize<u32> {
        self.size
    }

    pub fn adapter_name(&self) -> &str {
        &self.adapter_name
    }

    pub fn set_camera(&mut self, eye: Vec3, target: Vec3) {
        self.cam_eye = eye;
        self.cam_target = target;
    }

    pub fn set_fovy(&mut self, degrees: f32) {
        self.fovy_degrees = degrees;
    }

    pub fn set_clip_planes(&mut self, near: f32, far: f32) {
        assert!(near > 0.0 && near < far, "clip planes must satisfy 0 < near < far");
        self.near_clip = near;
        self.far_clip = far;
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Partial update of the material slot in the global block, keyed
    /// by its byte offset. The mesh passes shade from each material's
    /// own uniform block, which can differ per draw; this slot holds
    /// the block layout's scene-wide value.
    pub fn update_material_props(&mut self, roughness: f32, metallic: f32, has_normal_map: bool) {
        self.globals.material_props = [
            roughness,
            metallic,
            if has_normal_map { 1.0 } else { 0.0 },
            0.0,
        ];
        self.queue.write_buffer(
            &self.global_buf,
            GlobalUniforms::MATERIAL_PROPS_OFFSET,
            bytemuck::bytes_of(&self.globals.material_props),
        );
    }

    /// Stage the per-draw transform. Staged by uniform name; flushed to
    /// the GPU once at the top of the next frame.
    pub fn set_model_matrix(&mut self, model_to_world: Mat4) {
        self.object_uniforms.set_mat4("model_to_world", model_to_world);
        self.object_uniforms
            .set_mat4("normal_matrix", model::normal_matrix(model_to_world));
    }

    /// Recompute view/projection from camera state and push the whole
    /// global block.
    pub(crate) fn write_globals(&mut self) {
        let aspect = self.config.width.max(1) as f32 / self.config.height.max(1) as f32;
        let view = prism_math::look_at(self.cam_eye, self.cam_target);
        let perspective =
            prism_math::perspective(self.fovy_degrees, aspect, self.near_clip, self.far_clip);
        self.globals.clip = [
            self.config.width as f32,
            self.config.height as f32,
            self.near_clip,
            self.far_clip,
        ];
        self.globals.camera_pos = [self.cam_eye.x, self.cam_eye.y, self.cam_eye.z, 1.0];
        self.globals.view = view.to_cols_array_2d();
        self.globals.perspective = perspective.to_cols_array_2d();
        self.queue
            .write_buffer(&self.global_buf, 0, bytemuck::bytes_of(&self.globals));
    }

    pub fn resize(&mut self, new_size: PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.size = new_size;
        self.config.width = new_size.width;
        self.config.height = new_size.height;
        self.surface.configure(&self.device, &self.config);

        self.depth_fb = Framebuffer::new(
            &self.device,
            FramebufferDesc {
                label: "depth_prepass",
                width: self.config.width,
                height: self.config.height,
                color_count: 0,
                color_format: SCENE_FORMAT,
                depth: DepthSpec::Owned,
                sample_count: self.sample_count,
            },
        )
        .expect("depth prepass framebuffer");
        let shared_depth = Arc::clone(self.depth_fb.depth_attachment().expect("owned depth"));
        self.scene_fb = Framebuffer::new(
            &self.device,
            FramebufferDesc {
                label: "scene",
                width: self.config.width,
                height: self.config.height,
                color_count: 1,
                color_format: SCENE_FORMAT,
                depth: DepthSpec::Shared(shared_depth),
                sample_count: self.sample_count,
            },
        )
        .expect("scene framebuffer");
        self.resolve_target = Texture::color_target(
            &self.device,
            "scene_resolve",
            self.config.width,
            self.config.height,
            SCENE_FORMAT,
            1,
        );
        self.blit_bg = blit_bind_group(
            &self.device,
            &self.blit_layout,
            &self.resolve_target,
            &self.clamp_sampler,
        );
        self.write_globals();
    }

    /// Upload a validated model for drawing.
    pub fn upload_model(&self, model: &Model) -> GpuModel {
        GpuModel::upload(
            &self.device,
            &self.queue,
            &self.material_layout,
            &self.material_sampler,
            model,
        )
    }
}

impl Drop for Gfx<'_> {
    fn drop(&mut self) {
        SESSION_LIVE.store(false, Ordering::SeqCst);
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: u64,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: core::num::NonZeroU64::new(size),
            },
            count: None,
        }],
    })
}

fn texture_entry(
    binding: u32,
    dimension: wgpu::TextureViewDimension,
    filterable: bool,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable },
            view_dimension: dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32, ty: wgpu::SamplerBindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(ty),
        count: None,
    }
}

fn blit_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    source: &Texture,
    sampler: &wgpu::Sampler,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("blit_bg"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&source.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

fn must_compile(
    device: &wgpu::Device,
    label: &str,
    stage: crate::error::ShaderStage,
    source: &str,
) -> wgpu::ShaderModule {
    match crate::shader::compile_module(device, label, stage, source) {
        Ok(module) => module,
        Err(e) => panic!("embedded shader failed validation: {e}"),
    }
}

const QUAD_VERTS: [QuadVertex; 4] = [
    QuadVertex { position: [-1.0, -1.0, 0.0], uv: [0.0, 1.0] },
    QuadVertex { position: [1.0, -1.0, 0.0], uv: [1.0, 1.0] },
    QuadVertex { position: [1.0, 1.0, 0.0], uv: [1.0, 0.0] },
    QuadVertex { position: [-1.0, 1.0, 0.0], uv: [0.0, 0.0] },
];

/// 36-vertex unit cube, faces wound for inside viewing.
pub(crate) fn cube_vertices() -> Vec<PositionVertex> {
    const P: [[f32; 3]; 36] = [
        [-1.0, 1.0, -1.0], [-1.0, -1.0, -1.0], [1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0],
        [-1.0, -1.0, 1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0], [-1.0, 1.0, 1.0], [-1.0, -1.0, 1.0],
        [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [1.0, -1.0, -1.0],
        [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0],
        [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0],
        [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0],
        [-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [1.0, -1.0, 1.0],
    ];
    P.iter().map(|&p| PositionVertex { position: p }).collect()
}
