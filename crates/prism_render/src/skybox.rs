//! Environment skybox: six uploaded faces, or an equirectangular HDR
//! baked into a cubemap at load time.

use std::path::Path;

use glam::Vec3;
use log::info;

use crate::cubemap::{Cubemap, FACES, FACE_COUNT};
use crate::error::AssetLoadError;
use crate::gfx::Gfx;
use crate::render::draw_geometry;
use crate::shader::{ShaderProgram, UniformTable};
use crate::shaders;
use crate::texture::Texture;
use crate::uniforms::BakeUniforms;
use crate::wgpu;

/// Square face resolution used when baking an equirect source.
pub const BAKE_FACE_SIZE: u32 = 2048;

pub struct Skybox {
    pub cubemap: Cubemap,
    pub bind_group: wgpu::BindGroup,
}

impl<'w> Gfx<'w> {
    /// Build a skybox from six face images in cubemap order
    /// (+X, -X, +Y, -Y, +Z, -Z). All faces must decode to the same
    /// square size.
    pub fn load_skybox_from_images(&mut self, paths: &[&Path]) -> Result<Skybox, AssetLoadError> {
        if paths.len() != FACE_COUNT {
            return Err(AssetLoadError::FaceCount(paths.len()));
        }

        let mut cubemap = None;
        for (i, path) in paths.iter().enumerate() {
            let img = image::open(path)
                .map_err(|e| AssetLoadError::from_image(path, e))?
                .to_rgba8();
            let (w, h) = (img.width(), img.height());

            let cube = cubemap.get_or_insert_with(|| {
                Cubemap::new(
                    &self.device,
                    "skybox_cubemap",
                    w,
                    wgpu::TextureFormat::Rgba8UnormSrgb,
                    false,
                )
            });
            if w != cube.face_size || h != cube.face_size {
                return Err(AssetLoadError::FaceSize {
                    face: i,
                    expected: cube.face_size,
                    got_w: w,
                    got_h: h,
                });
            }
            cube.buffer_face(&self.queue, FACES[i], &img.into_raw());
        }

        let cubemap = cubemap.expect("six faces buffered");
        assert!(cubemap.is_complete());
        Ok(self.finish_skybox(cubemap))
    }

    /// Six conventionally named faces from one directory:
    /// right/left/top/bottom/front/back.jpg.
    pub fn load_skybox_from_dir(&mut self, dir: &Path) -> Result<Skybox, AssetLoadError> {
        let names = ["right", "left", "top", "bottom", "front", "back"];
        let paths: Vec<_> = names.iter().map(|n| dir.join(format!("{n}.jpg"))).collect();
        let refs: Vec<&Path> = paths.iter().map(|p| p.as_path()).collect();
        self.load_skybox_from_images(&refs)
    }

    /// Decode an equirectangular HDR image and bake it into the six
    /// cube faces by rendering a unit cube once per face. Runs at load,
    /// never per frame.
    pub fn load_skybox_from_hdr(&mut self, path: &Path) -> Result<Skybox, AssetLoadError> {
        let img = image::open(path)
            .map_err(|e| AssetLoadError::from_image(path, e))?
            .to_rgb32f();
        let (w, h) = (img.width(), img.height());
        let equirect = Texture::load_rgb32f(
            &self.device,
            &self.queue,
            "equirect_source",
            w,
            h,
            img.as_raw(),
        );
        info!("baking {w}x{h} equirect source into {BAKE_FACE_SIZE}^2 cubemap");

        // The bake program carries its per-face uniforms in a named
        // table; a validation failure is fatal to this asset only.
        let uniforms = UniformTable::new(core::mem::size_of::<BakeUniforms>())
            .declare("view", 0, 64)
            .declare("projection", 64, 64);
        let mut program =
            ShaderProgram::compile(&self.device, "bake", shaders::BAKE_VS, shaders::BAKE_FS, uniforms)?;

        let bake_pipeline = crate::pipeline::create_bake_pipeline(
            &self.device,
            &[&self.bake_uniform_layout, &self.bake_tex_layout],
            &program.vs,
            &program.fs,
            crate::geometry::PositionVertex::layout().stride(),
            &crate::geometry::PositionVertex::layout().wgpu_attributes(),
            wgpu::TextureFormat::Rgba16Float,
        );

        let mut cubemap = Cubemap::new(
            &self.device,
            "skybox_cubemap",
            BAKE_FACE_SIZE,
            wgpu::TextureFormat::Rgba16Float,
            true,
        );

        let bake_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bake_uniform_bg"),
            layout: &self.bake_uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: program
                    .uniform_buffer()
                    .expect("bake uniform buffer")
                    .as_entire_binding(),
            }],
        });
        let equirect_bg = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bake_tex_bg"),
            layout: &self.bake_tex_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&equirect.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.nearest_sampler),
                },
            ],
        });

        let projection = prism_math::perspective(90.0, 1.0, 0.1, 10.0);
        for &face in &FACES {
            // One submission per face so the shared uniform buffer holds
            // this face's view when its pass executes.
            let view = prism_math::look_at_up(Vec3::ZERO, face.forward(), face.up());
            program.uniforms.set_mat4("view", view);
            program.uniforms.set_mat4("projection", projection);
            program.flush(&self.queue);

            let face_view = cubemap.face_view(face);
            let mut encoder = self
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("bake_face"),
                });
            {
                let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("bake_face"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &face_view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color {
                                r: 1.0,
                                g: 1.0,
                                b: 0.0,
                                a: 1.0,
                            }),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                rp.set_pipeline(&bake_pipeline);
                rp.set_bind_group(0, &bake_bg, &[]);
                rp.set_bind_group(1, &equirect_bg, &[]);
                draw_geometry(&mut rp, &self.cube);
            }
            self.queue.submit(Some(encoder.finish()));
            cubemap.mark_face_rendered(face);
        }

        assert!(cubemap.is_complete(), "bake left faces unrendered");
        Ok(self.finish_skybox(cubemap))
    }

    fn finish_skybox(&self, cubemap: Cubemap) -> Skybox {
        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox_bg"),
            layout: &self.skybox_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&cubemap.cube_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.clamp_sampler),
                },
            ],
        });
        Skybox { cubemap, bind_group }
    }
}
