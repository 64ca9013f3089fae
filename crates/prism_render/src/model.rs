//! CPU-side model data and its GPU upload.
//!
//! A `Model` is validated at construction; everything downstream can
//! rely on material indices being in range and index counts forming
//! whole triangles. `GpuModel` is the uploaded counterpart with one
//! bind group per material.

use glam::{Mat4, Vec2, Vec3};

use crate::error::AssetLoadError;
use crate::geometry::{IndexedGeometry, Vertex};
use crate::texture::{self, Texture};
use crate::uniforms::MaterialUniforms;
use crate::wgpu;

/// Decoded 8-bit RGBA pixels, not yet on the device.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl ImageData {
    pub fn decode(path: &std::path::Path) -> Result<Self, AssetLoadError> {
        let img = image::open(path)
            .map_err(|e| AssetLoadError::from_image(path, e))?
            .to_rgba8();
        Ok(Self {
            width: img.width(),
            height: img.height(),
            pixels: img.into_raw(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Material {
    pub roughness: f32,
    pub metallic: f32,
    pub diffuse: Option<ImageData>,
    pub normal_map: Option<ImageData>,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub material_index: usize,
}

#[derive(Debug, Clone)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

impl Model {
    /// Validates mesh/material cross-references up front.
    pub fn new(meshes: Vec<Mesh>, materials: Vec<Material>) -> Result<Self, AssetLoadError> {
        if meshes.is_empty() {
            return Err(AssetLoadError::EmptyModel);
        }
        for (i, mesh) in meshes.iter().enumerate() {
            if mesh.material_index >= materials.len() {
                return Err(AssetLoadError::BadMaterialIndex {
                    mesh: i,
                    index: mesh.material_index,
                    materials: materials.len(),
                });
            }
            assert!(
                mesh.indices.len() % 3 == 0,
                "mesh {i} index count is not a whole number of triangles"
            );
        }
        Ok(Self { meshes, materials })
    }
}

/// Per-triangle tangent basis from uv deltas, accumulated per vertex and
/// Gram-Schmidt orthonormalized against the vertex normal. For meshes
/// whose source provides no tangents.
pub fn compute_tangents(vertices: &mut [Vertex], indices: &[u32]) {
    let mut tangents = vec![Vec3::ZERO; vertices.len()];
    let mut bitangents = vec![Vec3::ZERO; vertices.len()];

    for tri in indices.chunks_exact(3) {
        let (i0, i1, i2) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
        let p0 = Vec3::from(vertices[i0].position);
        let p1 = Vec3::from(vertices[i1].position);
        let p2 = Vec3::from(vertices[i2].position);
        let uv0 = Vec2::from(vertices[i0].uv);
        let uv1 = Vec2::from(vertices[i1].uv);
        let uv2 = Vec2::from(vertices[i2].uv);

        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let duv1 = uv1 - uv0;
        let duv2 = uv2 - uv0;

        let det = duv1.x * duv2.y - duv2.x * duv1.y;
        if det.abs() < 1e-8 {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (e1 * duv2.y - e2 * duv1.y) * r;
        let bitangent = (e2 * duv1.x - e1 * duv2.x) * r;

        for &i in &[i0, i1, i2] {
            tangents[i] += tangent;
            bitangents[i] += bitangent;
        }
    }

    for (i, v) in vertices.iter_mut().enumerate() {
        let n = Vec3::from(v.normal);
        let t = tangents[i];
        // Orthonormalize against the normal; degenerate uv mappings fall
        // back to an arbitrary perpendicular axis.
        let t = t - n * n.dot(t);
        let t = if t.length_squared() > 1e-12 {
            t.normalize()
        } else {
            n.cross(Vec3::X).try_normalize().unwrap_or(Vec3::Y)
        };
        let b = if bitangents[i].length_squared() > 1e-12 {
            let raw = n.cross(t);
            // Preserve handedness from the uv winding.
            if raw.dot(bitangents[i]) < 0.0 {
                -raw
            } else {
                raw
            }
        } else {
            n.cross(t)
        };
        v.tangent = t.to_array();
        v.bitangent = b.to_array();
    }
}

pub struct GpuMaterial {
    pub bind_group: wgpu::BindGroup,
    pub has_normal_map: bool,
    _uniform_buf: wgpu::Buffer,
    _diffuse: Texture,
    _normal: Texture,
}

impl GpuMaterial {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        material: &Material,
    ) -> Self {
        use wgpu::util::DeviceExt;

        let diffuse = match &material.diffuse {
            Some(img) => Texture::load_rgba8(
                device, queue, "material_diffuse", img.width, img.height, &img.pixels, true,
            ),
            None => texture::white_texture(device, queue),
        };
        let has_normal_map = material.normal_map.is_some();
        let normal = match &material.normal_map {
            Some(img) => Texture::load_rgba8(
                device, queue, "material_normal", img.width, img.height, &img.pixels, false,
            ),
            None => texture::flat_normal_texture(device, queue),
        };

        let props = MaterialUniforms {
            props: [
                material.roughness,
                material.metallic,
                if has_normal_map { 1.0 } else { 0.0 },
                0.0,
            ],
        };
        let uniform_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("material_uniforms"),
            contents: bytemuck::bytes_of(&props),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&diffuse.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&normal.view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: uniform_buf.as_entire_binding(),
                },
            ],
        });

        Self {
            bind_group,
            has_normal_map,
            _uniform_buf: uniform_buf,
            _diffuse: diffuse,
            _normal: normal,
        }
    }
}

pub struct GpuMesh {
    pub geometry: IndexedGeometry,
    pub material_index: usize,
}

pub struct GpuModel {
    pub meshes: Vec<GpuMesh>,
    pub materials: Vec<GpuMaterial>,
}

impl GpuModel {
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        model: &Model,
    ) -> Self {
        let materials = model
            .materials
            .iter()
            .map(|m| GpuMaterial::upload(device, queue, material_layout, sampler, m))
            .collect();
        let meshes = model
            .meshes
            .iter()
            .map(|m| GpuMesh {
                geometry: IndexedGeometry::upload(
                    device,
                    "mesh",
                    &m.vertices,
                    &m.indices,
                    wgpu::PrimitiveTopology::TriangleList,
                ),
                material_index: m.material_index,
            })
            .collect();
        Self { meshes, materials }
    }
}

/// Inverse-transpose of the upper 3x3, widened back out so std140/WGSL
/// column alignment holds. Computed on the CPU once per object update.
pub fn normal_matrix(model_to_world: Mat4) -> Mat4 {
    let m3 = glam::Mat3::from_mat4(model_to_world);
    Mat4::from_mat3(m3.inverse().transpose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;

    fn quad_vertices() -> (Vec<Vertex>, Vec<u32>) {
        let mk = |p: [f32; 3], uv: [f32; 2]| Vertex {
            position: p,
            normal: [0.0, 0.0, 1.0],
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
            uv,
        };
        let vertices = vec![
            mk([0.0, 0.0, 0.0], [0.0, 0.0]),
            mk([1.0, 0.0, 0.0], [1.0, 0.0]),
            mk([1.0, 1.0, 0.0], [1.0, 1.0]),
            mk([0.0, 1.0, 0.0], [0.0, 1.0]),
        ];
        (vertices, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn model_rejects_out_of_range_material_index() {
        let (vertices, indices) = quad_vertices();
        let mesh = Mesh {
            vertices,
            indices,
            material_index: 1,
        };
        let materials = vec![Material {
            roughness: 0.5,
            metallic: 0.0,
            diffuse: None,
            normal_map: None,
        }];
        match Model::new(vec![mesh], materials) {
            Err(AssetLoadError::BadMaterialIndex {
                mesh: 0,
                index: 1,
                materials: 1,
            }) => {}
            other => panic!("expected BadMaterialIndex, got {other:?}"),
        }
    }

    #[test]
    fn model_rejects_zero_meshes() {
        match Model::new(vec![], vec![]) {
            Err(AssetLoadError::EmptyModel) => {}
            other => panic!("expected EmptyModel, got {other:?}"),
        }
    }

    #[test]
    fn tangents_are_orthonormal_to_the_normal() {
        let (mut vertices, indices) = quad_vertices();
        compute_tangents(&mut vertices, &indices);
        for v in &vertices {
            let n = Vec3::from(v.normal);
            let t = Vec3::from(v.tangent);
            let b = Vec3::from(v.bitangent);
            assert!((t.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(t).abs() < 1e-5);
            assert!(n.dot(b).abs() < 1e-5);
            assert!(t.dot(b).abs() < 1e-5);
        }
    }

    #[test]
    fn planar_quad_tangent_follows_u_axis() {
        let (mut vertices, indices) = quad_vertices();
        compute_tangents(&mut vertices, &indices);
        let t = Vec3::from(vertices[0].tangent);
        assert!((t - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn normal_matrix_undoes_nonuniform_scale() {
        let m = Mat4::from_scale(Vec3::new(2.0, 1.0, 1.0));
        let nm = glam::Mat3::from_mat4(normal_matrix(m));
        // A normal on the scaled axis keeps its direction after the
        // inverse-transpose, up to renormalization.
        let n = (nm * Vec3::new(1.0, 1.0, 0.0).normalize()).normalize();
        let expected = Vec3::new(0.5, 1.0, 0.0).normalize();
        assert!((n - expected).length() < 1e-5);
    }
}
