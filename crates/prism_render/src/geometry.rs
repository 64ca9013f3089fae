//! Vertex layouts and indexed geometry buffers.
//!
//! Layouts are plain data: an ordered attribute list whose byte offsets
//! are the running sum of the preceding attribute sizes (tight packing,
//! no padding). Buffer setup consumes the same list that tests can
//! inspect.

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::wgpu;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFormat {
    F32,
    I32,
    U32,
}

impl AttributeFormat {
    pub const fn component_size(self) -> u64 {
        4
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeDesc {
    pub components: u32,
    pub format: AttributeFormat,
}

impl AttributeDesc {
    pub const fn f32x(components: u32) -> Self {
        Self {
            components,
            format: AttributeFormat::F32,
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.format.component_size() * self.components as u64
    }

    fn vertex_format(&self) -> wgpu::VertexFormat {
        match (self.format, self.components) {
            (AttributeFormat::F32, 1) => wgpu::VertexFormat::Float32,
            (AttributeFormat::F32, 2) => wgpu::VertexFormat::Float32x2,
            (AttributeFormat::F32, 3) => wgpu::VertexFormat::Float32x3,
            (AttributeFormat::F32, 4) => wgpu::VertexFormat::Float32x4,
            (AttributeFormat::I32, 1) => wgpu::VertexFormat::Sint32,
            (AttributeFormat::I32, 2) => wgpu::VertexFormat::Sint32x2,
            (AttributeFormat::I32, 3) => wgpu::VertexFormat::Sint32x3,
            (AttributeFormat::I32, 4) => wgpu::VertexFormat::Sint32x4,
            (AttributeFormat::U32, 1) => wgpu::VertexFormat::Uint32,
            (AttributeFormat::U32, 2) => wgpu::VertexFormat::Uint32x2,
            (AttributeFormat::U32, 3) => wgpu::VertexFormat::Uint32x3,
            (AttributeFormat::U32, 4) => wgpu::VertexFormat::Uint32x4,
            (f, n) => panic!("unsupported attribute {f:?}x{n}"),
        }
    }
}

/// An ordered attribute list for one vertex shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexLayout {
    attrs: Vec<AttributeDesc>,
}

impl VertexLayout {
    pub fn new(attrs: Vec<AttributeDesc>) -> Self {
        assert!(!attrs.is_empty(), "vertex layout needs at least one attribute");
        Self { attrs }
    }

    /// Byte offset of each attribute: the running sum of prior sizes.
    pub fn offsets(&self) -> Vec<u64> {
        let mut offsets = Vec::with_capacity(self.attrs.len());
        let mut running = 0;
        for a in &self.attrs {
            offsets.push(running);
            running += a.byte_size();
        }
        offsets
    }

    pub fn stride(&self) -> u64 {
        self.attrs.iter().map(AttributeDesc::byte_size).sum()
    }

    /// The wgpu attribute array matching this layout, locations assigned
    /// in declaration order.
    pub fn wgpu_attributes(&self) -> Vec<wgpu::VertexAttribute> {
        self.attrs
            .iter()
            .zip(self.offsets())
            .enumerate()
            .map(|(i, (attr, offset))| wgpu::VertexAttribute {
                format: attr.vertex_format(),
                offset,
                shader_location: i as u32,
            })
            .collect()
    }
}

/// The renderer's mesh vertex: position, normal, tangent frame, uv.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn layout() -> VertexLayout {
        VertexLayout::new(vec![
            AttributeDesc::f32x(3),
            AttributeDesc::f32x(3),
            AttributeDesc::f32x(3),
            AttributeDesc::f32x(3),
            AttributeDesc::f32x(2),
        ])
    }
}

/// Position-only vertex, used by the skybox cube.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct PositionVertex {
    pub position: [f32; 3],
}

impl PositionVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout::new(vec![AttributeDesc::f32x(3)])
    }
}

/// Position + uv vertex, used by the fullscreen blit quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl QuadVertex {
    pub fn layout() -> VertexLayout {
        VertexLayout::new(vec![AttributeDesc::f32x(3), AttributeDesc::f32x(2)])
    }
}

/// Every index must address a real vertex.
pub fn indices_in_bounds(indices: &[u32], vertex_count: usize) -> bool {
    indices.iter().all(|&i| (i as usize) < vertex_count)
}

/// A vertex/index buffer pair plus its primitive topology tag.
pub struct IndexedGeometry {
    pub vbuf: wgpu::Buffer,
    pub ibuf: wgpu::Buffer,
    pub index_count: u32,
    pub topology: wgpu::PrimitiveTopology,
}

impl IndexedGeometry {
    pub fn upload<V: Pod>(
        device: &wgpu::Device,
        label: &str,
        vertices: &[V],
        indices: &[u32],
        topology: wgpu::PrimitiveTopology,
    ) -> Self {
        assert!(
            indices_in_bounds(indices, vertices.len()),
            "index out of bounds for '{label}'"
        );
        if topology == wgpu::PrimitiveTopology::TriangleList {
            assert!(indices.len() % 3 == 0, "triangle list index count for '{label}'");
        }
        let vbuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_vbuf")),
            contents: bytemuck::cast_slice(vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ibuf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label}_ibuf")),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vbuf,
            ibuf,
            index_count: indices.len() as u32,
            topology,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_running_sums_with_no_gaps() {
        let layout = Vertex::layout();
        // pos 3f, normal 3f, tangent 3f, bitangent 3f, uv 2f
        assert_eq!(layout.offsets(), vec![0, 12, 24, 36, 48]);
        assert_eq!(layout.stride(), 56);
        assert_eq!(layout.stride() as usize, std::mem::size_of::<Vertex>());
    }

    #[test]
    fn wgpu_attributes_mirror_the_layout() {
        let attrs = QuadVertex::layout().wgpu_attributes();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[0].format, wgpu::VertexFormat::Float32x3);
        assert_eq!(attrs[0].offset, 0);
        assert_eq!(attrs[0].shader_location, 0);
        assert_eq!(attrs[1].format, wgpu::VertexFormat::Float32x2);
        assert_eq!(attrs[1].offset, 12);
        assert_eq!(attrs[1].shader_location, 1);
    }

    #[test]
    fn struct_field_offsets_match_declared_layout() {
        let offsets = Vertex::layout().offsets();
        assert_eq!(offsets[1] as usize, std::mem::offset_of!(Vertex, normal));
        assert_eq!(offsets[2] as usize, std::mem::offset_of!(Vertex, tangent));
        assert_eq!(offsets[3] as usize, std::mem::offset_of!(Vertex, bitangent));
        assert_eq!(offsets[4] as usize, std::mem::offset_of!(Vertex, uv));
    }

    #[test]
    fn index_bounds_check() {
        assert!(indices_in_bounds(&[0, 1, 2], 3));
        assert!(!indices_in_bounds(&[0, 3, 2], 3));
        assert!(indices_in_bounds(&[], 0));
    }
}
