//! Offscreen render targets: color attachments plus an optional depth
//! attachment, owned or shared.
//!
//! Attachments travel as `Arc<Texture>` so two framebuffers can render
//! against the same depth buffer (prepass writes it, the color pass
//! tests against it). Validation happens once at construction; a
//! framebuffer that exists is usable.

use std::sync::Arc;

use crate::error::ConfigError;
use crate::texture::Texture;
use crate::wgpu;

pub const MAX_COLOR_ATTACHMENTS: usize = 8;

/// Where a framebuffer's depth attachment comes from.
pub enum DepthSpec {
    /// Create and own a fresh depth texture.
    Owned,
    /// Test/write against a depth texture another framebuffer owns.
    Shared(Arc<Texture>),
    /// No depth attachment at all.
    None,
}

pub struct FramebufferDesc {
    pub label: &'static str,
    pub width: u32,
    pub height: u32,
    pub color_count: usize,
    pub color_format: wgpu::TextureFormat,
    pub depth: DepthSpec,
    pub sample_count: u32,
}

pub struct Framebuffer {
    pub width: u32,
    pub height: u32,
    pub sample_count: u32,
    color: Vec<Arc<Texture>>,
    depth: Option<Arc<Texture>>,
}

/// Attachment-shape check, split out of construction so it can run
/// without a device.
fn validate(
    color_count: usize,
    has_depth: bool,
    shared_depth: Option<(u32, u32, u32)>,
    width: u32,
    height: u32,
    sample_count: u32,
) -> Result<(), ConfigError> {
    if color_count == 0 && !has_depth {
        return Err(ConfigError::NoAttachments);
    }
    if color_count > MAX_COLOR_ATTACHMENTS {
        return Err(ConfigError::TooManyColorAttachments(color_count));
    }
    if let Some((dw, dh, ds)) = shared_depth {
        if (dw, dh) != (width, height) {
            return Err(ConfigError::SizeMismatch {
                expected_w: width,
                expected_h: height,
                got_w: dw,
                got_h: dh,
            });
        }
        if ds != sample_count {
            return Err(ConfigError::SampleCountMismatch {
                expected: sample_count,
                got: ds,
            });
        }
    }
    Ok(())
}

impl Framebuffer {
    pub fn new(device: &wgpu::Device, desc: FramebufferDesc) -> Result<Self, ConfigError> {
        let shared_dims = match &desc.depth {
            DepthSpec::Shared(t) => Some((t.width, t.height, t.sample_count)),
            _ => None,
        };
        validate(
            desc.color_count,
            !matches!(desc.depth, DepthSpec::None),
            shared_dims,
            desc.width,
            desc.height,
            desc.sample_count,
        )?;

        let color = (0..desc.color_count)
            .map(|i| {
                Arc::new(Texture::color_target(
                    device,
                    &format!("{}_color{}", desc.label, i),
                    desc.width,
                    desc.height,
                    desc.color_format,
                    desc.sample_count,
                ))
            })
            .collect();
        let depth = match desc.depth {
            DepthSpec::Owned => Some(Arc::new(Texture::depth(
                device,
                &format!("{}_depth", desc.label),
                desc.width,
                desc.height,
                desc.sample_count,
            ))),
            DepthSpec::Shared(t) => Some(t),
            DepthSpec::None => None,
        };
        Ok(Self {
            width: desc.width,
            height: desc.height,
            sample_count: desc.sample_count,
            color,
            depth,
        })
    }

    pub fn color(&self, index: usize) -> &Arc<Texture> {
        &self.color[index]
    }

    pub fn depth_attachment(&self) -> Option<&Arc<Texture>> {
        self.depth.as_ref()
    }

    /// Begin a pass over every attachment. The viewport is reset to this
    /// framebuffer's full extent; passes never inherit another target's
    /// viewport.
    pub fn begin_pass<'p>(
        &'p self,
        encoder: &'p mut wgpu::CommandEncoder,
        label: &str,
        color_load: wgpu::LoadOp<wgpu::Color>,
        depth_load: wgpu::LoadOp<f32>,
    ) -> wgpu::RenderPass<'p> {
        let color_attachments: Vec<_> = self
            .color
            .iter()
            .map(|t| {
                Some(wgpu::RenderPassColorAttachment {
                    view: &t.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: color_load,
                        store: wgpu::StoreOp::Store,
                    },
                })
            })
            .collect();
        let mut rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &color_attachments,
            depth_stencil_attachment: self.depth.as_ref().map(|d| {
                wgpu::RenderPassDepthStencilAttachment {
                    view: &d.view,
                    depth_ops: Some(wgpu::Operations {
                        load: depth_load,
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        rp.set_viewport(0.0, 0.0, self.width as f32, self.height as f32, 0.0, 1.0);
        rp
    }

    /// Copy color attachment 0 into a same-sized single-sample texture.
    /// Multisampled sources resolve through a render pass; single-sample
    /// sources use a plain texture copy.
    pub fn resolve_to(&self, encoder: &mut wgpu::CommandEncoder, target: &Texture) {
        assert_eq!((target.width, target.height), (self.width, self.height));
        let src = &self.color[0];
        if self.sample_count > 1 {
            let _rp = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("msaa_resolve"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &src.view,
                    resolve_target: Some(&target.view),
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Discard,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
        } else {
            encoder.copy_texture_to_texture(
                src.texture.as_image_copy(),
                target.texture.as_image_copy(),
                wgpu::Extent3d {
                    width: self.width,
                    height: self.height,
                    depth_or_array_layers: 1,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_framebuffer_is_rejected() {
        assert_eq!(
            validate(0, false, None, 64, 64, 1),
            Err(ConfigError::NoAttachments)
        );
    }

    #[test]
    fn attachment_count_is_capped() {
        assert_eq!(
            validate(9, false, None, 64, 64, 1),
            Err(ConfigError::TooManyColorAttachments(9))
        );
        assert_eq!(validate(8, false, None, 64, 64, 1), Ok(()));
    }

    #[test]
    fn shared_depth_must_match_size_and_samples() {
        assert_eq!(validate(1, true, Some((64, 64, 1)), 64, 64, 1), Ok(()));
        assert_eq!(
            validate(1, true, Some((32, 64, 1)), 64, 64, 1),
            Err(ConfigError::SizeMismatch {
                expected_w: 64,
                expected_h: 64,
                got_w: 32,
                got_h: 64,
            })
        );
        assert_eq!(
            validate(1, true, Some((64, 64, 4)), 64, 64, 1),
            Err(ConfigError::SampleCountMismatch { expected: 1, got: 4 })
        );
    }

    #[test]
    fn depth_only_framebuffer_is_valid() {
        assert_eq!(validate(0, true, None, 64, 64, 1), Ok(()));
        assert_eq!(validate(0, true, Some((64, 64, 1)), 64, 64, 1), Ok(()));
    }
}
