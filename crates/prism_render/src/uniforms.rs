//! GPU uniform block layouts.
//!
//! `GlobalUniforms` is the per-frame block every shader sees; its field
//! order and byte layout are a contract with the shader text (std140
//! equivalent: vec4, vec4, vec4, mat4, mat4, 16-byte aligned). Partial
//! updates are keyed by byte offset.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct GlobalUniforms {
    /// x,y = render target size, z,w = near/far clip.
    pub clip: [f32; 4],
    pub camera_pos: [f32; 4],
    /// x = roughness, y = metallic, z = normal-map-present flag.
    pub material_props: [f32; 4],
    pub view: [[f32; 4]; 4],
    pub perspective: [[f32; 4]; 4],
}

impl GlobalUniforms {
    pub const CLIP_OFFSET: u64 = std::mem::offset_of!(GlobalUniforms, clip) as u64;
    pub const CAMERA_POS_OFFSET: u64 = std::mem::offset_of!(GlobalUniforms, camera_pos) as u64;
    pub const MATERIAL_PROPS_OFFSET: u64 =
        std::mem::offset_of!(GlobalUniforms, material_props) as u64;
    pub const VIEW_OFFSET: u64 = std::mem::offset_of!(GlobalUniforms, view) as u64;
    pub const PERSPECTIVE_OFFSET: u64 = std::mem::offset_of!(GlobalUniforms, perspective) as u64;
    pub const SIZE: u64 = std::mem::size_of::<GlobalUniforms>() as u64;
}

impl Default for GlobalUniforms {
    fn default() -> Self {
        Self {
            clip: [1.0, 1.0, 0.1, 100.0],
            camera_pos: [0.0, 0.0, 0.0, 1.0],
            material_props: [1.0, 0.0, 0.0, 0.0],
            view: Mat4::IDENTITY.to_cols_array_2d(),
            perspective: Mat4::IDENTITY.to_cols_array_2d(),
        }
    }
}

/// Per-draw uniforms for the mesh passes. The normal matrix is computed
/// CPU-side (inverse-transpose of the model matrix) since the shading
/// language has no matrix inverse.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model_to_world: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
}

impl ObjectUniforms {
    pub const MODEL_TO_WORLD_OFFSET: u64 = 0;
    pub const NORMAL_MATRIX_OFFSET: u64 =
        std::mem::offset_of!(ObjectUniforms, normal_matrix) as u64;
    pub const SIZE: u64 = std::mem::size_of::<ObjectUniforms>() as u64;
}

/// Per-material scalar block: x = roughness, y = metallic,
/// z = normal-map-present flag.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct MaterialUniforms {
    pub props: [f32; 4],
}

/// Per-face uniforms for the equirect-to-cubemap bake pass.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub struct BakeUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_block_matches_declared_std140_layout() {
        assert_eq!(GlobalUniforms::CLIP_OFFSET, 0);
        assert_eq!(GlobalUniforms::CAMERA_POS_OFFSET, 16);
        assert_eq!(GlobalUniforms::MATERIAL_PROPS_OFFSET, 32);
        assert_eq!(GlobalUniforms::VIEW_OFFSET, 48);
        assert_eq!(GlobalUniforms::PERSPECTIVE_OFFSET, 112);
        assert_eq!(GlobalUniforms::SIZE, 176);
    }

    #[test]
    fn object_block_layout() {
        assert_eq!(ObjectUniforms::NORMAL_MATRIX_OFFSET, 64);
        assert_eq!(ObjectUniforms::SIZE, 128);
    }
}
