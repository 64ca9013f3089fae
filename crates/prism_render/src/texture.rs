//! Device textures: render targets, depth buffers, sampled images.
//!
//! One `Texture` entity carries an explicit kind tag instead of parallel
//! code paths per target type. Attachments that are shared between
//! framebuffers travel as `Arc<Texture>`; the last owner releases the
//! device object.

use crate::wgpu;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// What a texture is for. Determines format and usage defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureKind {
    Color2D,
    Depth2D,
    Multisampled2D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WrapMode {
    ClampToEdge,
    Repeat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    Linear,
    Nearest,
}

impl WrapMode {
    fn address_mode(self) -> wgpu::AddressMode {
        match self {
            WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            WrapMode::Repeat => wgpu::AddressMode::Repeat,
        }
    }
}

impl FilterMode {
    fn filter(self) -> wgpu::FilterMode {
        match self {
            FilterMode::Linear => wgpu::FilterMode::Linear,
            FilterMode::Nearest => wgpu::FilterMode::Nearest,
        }
    }
}

pub struct Texture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    pub kind: TextureKind,
    pub format: wgpu::TextureFormat,
    pub sample_count: u32,
}

impl Texture {
    /// Empty color storage for render-target use.
    pub fn color_target(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            kind: if sample_count > 1 {
                TextureKind::Multisampled2D
            } else {
                TextureKind::Color2D
            },
            format,
            sample_count,
        }
    }

    /// A float depth buffer for render-target use.
    pub fn depth(
        device: &wgpu::Device,
        label: &str,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            kind: TextureKind::Depth2D,
            format: DEPTH_FORMAT,
            sample_count,
        }
    }

    /// Upload 8-bit RGBA pixel data. `srgb` picks the sRGB or linear
    /// container format (diffuse maps are sRGB, normal maps are linear).
    pub fn load_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        data: &[u8],
        srgb: bool,
    ) -> Self {
        assert_eq!(data.len(), (width * height * 4) as usize, "pixel buffer size");
        let format = if srgb {
            wgpu::TextureFormat::Rgba8UnormSrgb
        } else {
            wgpu::TextureFormat::Rgba8Unorm
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        upload_rows(queue, &texture, width, height, 4, data);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            kind: TextureKind::Color2D,
            format,
            sample_count: 1,
        }
    }

    /// Upload 32-bit-float RGB pixels (HDR environment sources). Alpha is
    /// padded to 1.0 since RGB float formats are not texturable.
    pub fn load_rgb32f(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        label: &str,
        width: u32,
        height: u32,
        rgb: &[f32],
    ) -> Self {
        assert_eq!(rgb.len(), (width * height * 3) as usize, "pixel buffer size");
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for px in rgb.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 1.0]);
        }
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba32Float,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        upload_rows(queue, &texture, width, height, 16, bytemuck::cast_slice(&rgba));
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
            kind: TextureKind::Color2D,
            format: wgpu::TextureFormat::Rgba32Float,
            sample_count: 1,
        }
    }
}

/// Align bytes_per_row to COPY_BYTES_PER_ROW_ALIGNMENT and upload.
pub fn upload_rows(
    queue: &wgpu::Queue,
    tex: &wgpu::Texture,
    w: u32,
    h: u32,
    bytes_per_pixel: u32,
    data: &[u8],
) {
    let row_bytes = bytes_per_pixel * w;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    let padded = row_bytes.div_ceil(align) * align;
    let target = wgpu::ImageCopyTexture {
        texture: tex,
        mip_level: 0,
        origin: wgpu::Origin3d::ZERO,
        aspect: wgpu::TextureAspect::All,
    };
    let extent = wgpu::Extent3d {
        width: w,
        height: h,
        depth_or_array_layers: 1,
    };
    if padded == row_bytes {
        queue.write_texture(
            target,
            data,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(row_bytes),
                rows_per_image: Some(h),
            },
            extent,
        );
        return;
    }
    let mut staged = vec![0u8; (padded * h) as usize];
    for y in 0..h {
        let src = &data[(y * row_bytes) as usize..(y * row_bytes + row_bytes) as usize];
        let dst = &mut staged[(y * padded) as usize..(y * padded + row_bytes) as usize];
        dst.copy_from_slice(src);
    }
    queue.write_texture(
        target,
        &staged,
        wgpu::ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(padded),
            rows_per_image: Some(h),
        },
        extent,
    );
}

pub fn create_sampler(
    device: &wgpu::Device,
    label: &str,
    wrap: WrapMode,
    filter: FilterMode,
) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wrap.address_mode(),
        address_mode_v: wrap.address_mode(),
        address_mode_w: wrap.address_mode(),
        mag_filter: filter.filter(),
        min_filter: filter.filter(),
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    })
}

/// 1x1 white stand-in for meshes without a diffuse texture.
pub fn white_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> Texture {
    Texture::load_rgba8(device, queue, "fallback_white", 1, 1, &[255, 255, 255, 255], true)
}

/// 1x1 +Z tangent-space normal for meshes without a normal map. Shading
/// falls back to the interpolated vertex normal through it.
pub fn flat_normal_texture(device: &wgpu::Device, queue: &wgpu::Queue) -> Texture {
    Texture::load_rgba8(device, queue, "fallback_normal", 1, 1, &[128, 128, 255, 255], false)
}
