//! Procedural demo assets: a uv sphere, a cube, and a checker texture.
//! Stand-ins for a file importer, which stays outside the renderer.

use glam::Vec3;
use prism_render::geometry::Vertex;
use prism_render::model::{compute_tangents, ImageData, Material, Mesh, Model};

/// Blue-tinted checkerboard pixels, 16-pixel cells.
pub fn checker_image(w: u32, h: u32) -> ImageData {
    let mut pixels = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            let c = if ((x / 16) + (y / 16)) % 2 == 0 { 220 } else { 40 };
            pixels.extend_from_slice(&[c, c, 255, 255]);
        }
    }
    ImageData {
        width: w,
        height: h,
        pixels,
    }
}

/// A uv sphere with per-vertex normals and uvs; tangents are derived
/// from the uv mapping.
pub fn uv_sphere(radius: f32, stacks: u32, slices: u32) -> Mesh {
    assert!(stacks >= 2 && slices >= 3);
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for stack in 0..=stacks {
        let v = stack as f32 / stacks as f32;
        let phi = v * std::f32::consts::PI;
        for slice in 0..=slices {
            let u = slice as f32 / slices as f32;
            let theta = u * std::f32::consts::TAU;

            let normal = Vec3::new(
                phi.sin() * theta.cos(),
                phi.cos(),
                phi.sin() * theta.sin(),
            );
            vertices.push(Vertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                tangent: [0.0; 3],
                bitangent: [0.0; 3],
                uv: [u, v],
            });
        }
    }

    let ring = slices + 1;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * ring + slice;
            let b = a + ring;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }

    compute_tangents(&mut vertices, &indices);
    Mesh {
        vertices,
        indices,
        material_index: 0,
    }
}

/// An axis-aligned cube with per-face normals and uvs.
pub fn cube(half_extent: f32) -> Mesh {
    // normal, tangent axis, bitangent axis per face
    let faces: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, t, b) in faces {
        let base = vertices.len() as u32;
        for (su, sv, uv) in [
            (-1.0, -1.0, [0.0, 1.0]),
            (1.0, -1.0, [1.0, 1.0]),
            (1.0, 1.0, [1.0, 0.0]),
            (-1.0, 1.0, [0.0, 0.0]),
        ] {
            let position = (normal + t * su + b * sv) * half_extent;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: normal.to_array(),
                tangent: [0.0; 3],
                bitangent: [0.0; 3],
                uv,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    compute_tangents(&mut vertices, &indices);
    Mesh {
        vertices,
        indices,
        material_index: 0,
    }
}

/// The demo scene: one checkered sphere.
pub fn demo_model(roughness: f32, metallic: f32) -> Model {
    let material = Material {
        roughness,
        metallic,
        diffuse: Some(checker_image(256, 256)),
        normal_map: None,
    };
    Model::new(vec![uv_sphere(1.0, 32, 48)], vec![material]).expect("demo model is valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_sit_on_the_radius() {
        let mesh = uv_sphere(2.0, 8, 12);
        for v in &mesh.vertices {
            let r = Vec3::from(v.position).length();
            assert!((r - 2.0).abs() < 1e-4);
        }
        assert!(mesh.indices.len() % 3 == 0);
    }

    #[test]
    fn sphere_normals_point_outward() {
        let mesh = uv_sphere(1.0, 8, 12);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            let n = Vec3::from(v.normal);
            if p.length() > 1e-4 {
                assert!(p.normalize().dot(n) > 0.99);
            }
        }
    }

    #[test]
    fn cube_has_24_vertices_and_12_triangles() {
        let mesh = cube(1.0);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn demo_model_validates() {
        let model = demo_model(0.5, 0.0);
        assert_eq!(model.meshes.len(), 1);
        assert_eq!(model.materials.len(), 1);
    }
}
