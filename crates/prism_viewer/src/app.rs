//! winit application shell: owns the window, the renderer session, and
//! the demo scene, and drives one render per redraw.

use std::time::Instant;

use glam::{Vec3, Vec4Swizzles};
use log::{error, info, warn};
use prism_render::gfx::{Gfx, GfxConfig};
use prism_render::model::GpuModel;
use prism_render::skybox::Skybox;
use prism_render::winit as rwinit;
use prism_render::{wgpu, FrameGraph, SceneData};

use rwinit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::config::ViewerConfig;
use crate::procedural;

pub struct App {
    config: ViewerConfig,
    window: Option<&'static Window>,
    gfx: Option<Gfx<'static>>,
    fg: FrameGraph,
    model: Option<GpuModel>,
    skybox: Option<Skybox>,

    // orbit state
    angle_degrees: f32,
    last_frame: Instant,
}

impl App {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            window: None,
            gfx: None,
            fg: FrameGraph::standard(),
            model: None,
            skybox: None,
            angle_degrees: 0.0,
            last_frame: Instant::now(),
        }
    }

    fn load_skybox(gfx: &mut Gfx<'static>, config: &ViewerConfig) -> Option<Skybox> {
        if let Some(hdr) = &config.scene.skybox_hdr {
            match gfx.load_skybox_from_hdr(hdr) {
                Ok(sky) => return Some(sky),
                Err(e) => warn!("skybox hdr load failed: {e}"),
            }
        }
        if let Some(dir) = &config.scene.skybox_dir {
            match gfx.load_skybox_from_dir(dir) {
                Ok(sky) => return Some(sky),
                Err(e) => warn!("skybox dir load failed: {e}"),
            }
        }
        None
    }

    fn redraw(&mut self) {
        let Some(gfx) = self.gfx.as_mut() else { return };
        let Some(model) = self.model.as_ref() else { return };

        let dt = self.last_frame.elapsed().as_secs_f32();
        self.last_frame = Instant::now();
        self.angle_degrees = (self.angle_degrees + self.config.scene.orbit_speed * dt) % 360.0;

        let orbit = prism_math::rotate(0.0, self.angle_degrees, 0.0);
        let home = Vec3::new(0.0, 0.8, self.config.scene.camera_distance);
        let eye = (orbit * home.extend(1.0)).xyz();
        gfx.set_camera(eye, Vec3::ZERO);

        let scene = SceneData {
            model,
            skybox: self.skybox.as_ref(),
        };
        match gfx.render_with(&self.fg, &scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let size = gfx.size();
                gfx.resize(size);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("surface out of memory");
            }
            Err(e) => warn!("frame skipped: {e}"),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, el: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let attrs = Window::default_attributes()
            .with_title("prism viewer")
            .with_inner_size(PhysicalSize::new(
                self.config.graphics.window_width,
                self.config.graphics.window_height,
            ));
        let window = el.create_window(attrs).expect("create_window");
        let window_ref: &'static Window = Box::leak(Box::new(window));

        let gfx_config = GfxConfig {
            vsync: self.config.graphics.vsync,
            fovy_degrees: self.config.graphics.fov_degrees,
            near_clip: self.config.graphics.near_clip,
            far_clip: self.config.graphics.far_clip,
            sample_count: self.config.graphics.msaa_samples,
        };
        let mut gfx = match Gfx::start(window_ref, &gfx_config) {
            Ok(gfx) => gfx,
            Err(e) => {
                error!("renderer startup failed: {e}");
                el.exit();
                return;
            }
        };
        info!("renderer up on {}", gfx.adapter_name());

        gfx.set_clear_color(wgpu::Color {
            r: 0.05,
            g: 0.05,
            b: 0.08,
            a: 1.0,
        });

        let model = procedural::demo_model(
            self.config.scene.roughness,
            self.config.scene.metallic,
        );
        // Shading reads each material's own uniform block; this keeps
        // the global block's material slot in step with the demo scene.
        gfx.update_material_props(
            self.config.scene.roughness,
            self.config.scene.metallic,
            false,
        );
        self.model = Some(gfx.upload_model(&model));
        self.skybox = Self::load_skybox(&mut gfx, &self.config);

        self.window = Some(window_ref);
        self.gfx = Some(gfx);
        self.last_frame = Instant::now();
    }

    fn window_event(&mut self, el: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => el.exit(),
            WindowEvent::Resized(size) => {
                if let Some(gfx) = self.gfx.as_mut() {
                    gfx.resize(size);
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _el: &ActiveEventLoop) {
        if let Some(window) = self.window {
            window.request_redraw();
        }
    }
}
