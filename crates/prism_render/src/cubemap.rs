//! Cubemap environment textures.
//!
//! Six square faces stored as one 6-layer array texture with a cube
//! view. A face occupancy mask guards against rendering with a partially
//! buffered skybox.

use glam::Vec3;

use crate::wgpu;

pub const FACE_COUNT: usize = 6;

/// Fixed face ordering: +X, -X, +Y, -Y, +Z, -Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CubemapFace {
    Right = 0,
    Left = 1,
    Top = 2,
    Bottom = 3,
    Front = 4,
    Back = 5,
}

pub const FACES: [CubemapFace; FACE_COUNT] = [
    CubemapFace::Right,
    CubemapFace::Left,
    CubemapFace::Top,
    CubemapFace::Bottom,
    CubemapFace::Front,
    CubemapFace::Back,
];

impl CubemapFace {
    /// The axis the bake camera looks along for this face.
    pub fn forward(self) -> Vec3 {
        match self {
            CubemapFace::Right => Vec3::X,
            CubemapFace::Left => Vec3::NEG_X,
            CubemapFace::Top => Vec3::Y,
            CubemapFace::Bottom => Vec3::NEG_Y,
            CubemapFace::Front => Vec3::Z,
            CubemapFace::Back => Vec3::NEG_Z,
        }
    }

    /// Per-face up vector. The vertical faces cannot use the default
    /// up axis, so they take a Z up; every other face uses -Y to match
    /// cube-face texel orientation.
    pub fn up(self) -> Vec3 {
        match self {
            CubemapFace::Top => Vec3::Z,
            CubemapFace::Bottom => Vec3::NEG_Z,
            _ => Vec3::NEG_Y,
        }
    }
}

/// Which of the six faces have been buffered, one bit per face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FaceMask(u8);

impl FaceMask {
    pub fn mark(&mut self, face: CubemapFace) {
        self.0 |= 1 << face as u8;
    }

    pub fn is_complete(self) -> bool {
        self.0 == (1 << FACE_COUNT as u8) - 1
    }

    pub fn buffered_count(self) -> u32 {
        self.0.count_ones()
    }
}

pub struct Cubemap {
    pub texture: wgpu::Texture,
    pub cube_view: wgpu::TextureView,
    pub face_size: u32,
    pub format: wgpu::TextureFormat,
    buffered: FaceMask,
}

impl Cubemap {
    /// `render_target` adds the attachment usage needed by the
    /// equirect bake, which copies rendered faces into the layers.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        face_size: u32,
        format: wgpu::TextureFormat,
        render_target: bool,
    ) -> Self {
        let mut usage = wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST;
        if render_target {
            usage |= wgpu::TextureUsages::RENDER_ATTACHMENT;
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: face_size,
                height: face_size,
                depth_or_array_layers: FACE_COUNT as u32,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage,
            view_formats: &[],
        });
        let cube_view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some(label),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            array_layer_count: Some(FACE_COUNT as u32),
            ..Default::default()
        });
        Self {
            texture,
            cube_view,
            face_size,
            format,
            buffered: FaceMask::default(),
        }
    }

    /// Upload 8-bit RGBA pixels into one face slot. The data must match
    /// the cubemap's face resolution.
    pub fn buffer_face(&mut self, queue: &wgpu::Queue, face: CubemapFace, data: &[u8]) {
        assert_eq!(
            data.len(),
            (self.face_size * self.face_size * 4) as usize,
            "face pixel buffer size"
        );
        let row_bytes = self.face_size * 4;
        let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let padded = row_bytes.div_ceil(align) * align;
        let mut staged;
        let (bytes, bytes_per_row) = if padded == row_bytes {
            (data, row_bytes)
        } else {
            staged = vec![0u8; (padded * self.face_size) as usize];
            for y in 0..self.face_size {
                let src = &data[(y * row_bytes) as usize..((y + 1) * row_bytes) as usize];
                staged[(y * padded) as usize..(y * padded + row_bytes) as usize]
                    .copy_from_slice(src);
            }
            (&staged[..], padded)
        };
        queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: face as u32,
                },
                aspect: wgpu::TextureAspect::All,
            },
            bytes,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(bytes_per_row),
                rows_per_image: Some(self.face_size),
            },
            wgpu::Extent3d {
                width: self.face_size,
                height: self.face_size,
                depth_or_array_layers: 1,
            },
        );
        self.buffered.mark(face);
    }

    /// Mark a face as filled by a render-to-face copy rather than an
    /// upload.
    pub fn mark_face_rendered(&mut self, face: CubemapFace) {
        self.buffered.mark(face);
    }

    /// A 2D view of a single face layer, usable as a copy destination or
    /// render attachment.
    pub fn face_view(&self, face: CubemapFace) -> wgpu::TextureView {
        self.texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("cubemap_face"),
            dimension: Some(wgpu::TextureViewDimension::D2),
            base_array_layer: face as u32,
            array_layer_count: Some(1),
            ..Default::default()
        })
    }

    /// True only once all six faces have been buffered, in any order.
    pub fn is_complete(&self) -> bool {
        self.buffered.is_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_incomplete_until_all_six_faces() {
        let mut mask = FaceMask::default();
        assert!(!mask.is_complete());

        // Out-of-order uploads; still incomplete at five faces.
        for face in [
            CubemapFace::Back,
            CubemapFace::Top,
            CubemapFace::Right,
            CubemapFace::Bottom,
            CubemapFace::Left,
        ] {
            mask.mark(face);
            assert!(!mask.is_complete());
        }
        assert_eq!(mask.buffered_count(), 5);

        mask.mark(CubemapFace::Front);
        assert!(mask.is_complete());
    }

    #[test]
    fn marking_a_face_twice_is_idempotent() {
        let mut mask = FaceMask::default();
        mask.mark(CubemapFace::Right);
        mask.mark(CubemapFace::Right);
        assert_eq!(mask.buffered_count(), 1);
    }

    #[test]
    fn face_bases_are_orthogonal() {
        for face in FACES {
            assert!(face.forward().dot(face.up()).abs() < 1e-6);
            assert!((face.forward().length() - 1.0).abs() < 1e-6);
        }
    }
}
