//! Frame rendering: walk the framegraph, encode one pass per node,
//! submit, present.

use crate::framegraph::Pass;
use crate::gfx::Gfx;
use crate::geometry::IndexedGeometry;
use crate::model::GpuModel;
use crate::skybox::Skybox;
use crate::wgpu;
use crate::FrameGraph;

/// Everything a frame draws. Borrowed for the duration of one
/// `render_with` call.
pub struct SceneData<'a> {
    pub model: &'a GpuModel,
    pub skybox: Option<&'a Skybox>,
}

/// The single indexed-draw entry point; every pass funnels through it.
pub fn draw_geometry(pass: &mut wgpu::RenderPass<'_>, geometry: &IndexedGeometry) {
    assert_eq!(
        geometry.topology,
        wgpu::PrimitiveTopology::TriangleList,
        "render passes draw triangle lists"
    );
    pass.set_vertex_buffer(0, geometry.vbuf.slice(..));
    pass.set_index_buffer(geometry.ibuf.slice(..), wgpu::IndexFormat::Uint32);
    pass.draw_indexed(0..geometry.index_count, 0, 0..1);
}

impl<'w> Gfx<'w> {
    pub fn render_with(
        &mut self,
        fg: &FrameGraph,
        scene: &SceneData<'_>,
    ) -> Result<(), wgpu::SurfaceError> {
        // All buffer writes land before any encoded pass executes, so
        // uniforms are pushed before the encoder opens.
        self.write_globals();
        if self.object_uniforms.is_dirty() {
            self.queue
                .write_buffer(&self.object_buf, 0, self.object_uniforms.bytes());
            self.object_uniforms.mark_flushed();
        }

        let frame = self.surface.get_current_texture()?;
        let surface_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some("frame") });

        for pass in &fg.passes {
            match *pass {
                Pass::DepthPrepass => {
                    let mut rp = self.depth_fb.begin_pass(
                        &mut encoder,
                        "depth_prepass",
                        wgpu::LoadOp::Load,
                        wgpu::LoadOp::Clear(1.0),
                    );
                    rp.set_pipeline(&self.depth_pipeline);
                    rp.set_bind_group(0, &self.global_bg, &[]);
                    rp.set_bind_group(1, &self.object_bg, &[]);
                    for mesh in &scene.model.meshes {
                        draw_geometry(&mut rp, &mesh.geometry);
                    }
                }
                Pass::Scene => {
                    let mut rp = self.scene_fb.begin_pass(
                        &mut encoder,
                        "scene",
                        wgpu::LoadOp::Clear(self.clear_color),
                        wgpu::LoadOp::Load,
                    );
                    rp.set_pipeline(&self.pbr_pipeline);
                    rp.set_bind_group(0, &self.global_bg, &[]);
                    rp.set_bind_group(1, &self.object_bg, &[]);
                    for mesh in &scene.model.meshes {
                        let material = &scene.model.materials[mesh.material_index];
                        rp.set_bind_group(2, &material.bind_group, &[]);
                        draw_geometry(&mut rp, &mesh.geometry);
                    }
                }
                Pass::Skybox => {
                    let Some(skybox) = scene.skybox else { continue };
                    let mut rp = self.scene_fb.begin_pass(
                        &mut encoder,
                        "skybox",
                        wgpu::LoadOp::Load,
                        wgpu::LoadOp::Load,
                    );
                    rp.set_pipeline(&self.skybox_pipeline);
                    rp.set_bind_group(0, &self.global_bg, &[]);
                    rp.set_bind_group(1, &skybox.bind_group, &[]);
                    draw_geometry(&mut rp, &self.cube);
                }
                Pass::Blit => {
                    self.scene_fb.resolve_to(&mut encoder, &self.resolve_target);
                    let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("blit"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &surface_view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                                store: wgpu::StoreOp::Store,
                            },
                        })],
                        depth_stencil_attachment: None,
                        timestamp_writes: None,
                        occlusion_query_set: None,
                    });
                    rp.set_pipeline(&self.blit_pipeline);
                    rp.set_bind_group(0, &self.blit_bg, &[]);
                    draw_geometry(&mut rp, &self.quad);
                }
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}
