//! Camera and transform math for the renderer.
//!
//! Thin domain layer over `glam`: all matrices are column-major `Mat4`,
//! all angles are taken in degrees at the API boundary and converted
//! internally. Clip-space conventions follow wgpu (depth 0..1, right
//! handed view space looking down -Z).

pub use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

/// Normalize a vector. A zero-length input is a programmer error, not a
/// recoverable condition.
pub fn normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    assert!(len > 0.0, "cannot normalize a zero-length vector");
    v / len
}

/// Build a right-handed view matrix looking from `eye` toward `target`
/// with a +Y up vector.
///
/// When the view direction is exactly vertical the default up would be
/// parallel to it and the basis would collapse; the up vector is
/// deflected to ±Z based on the sign of the vertical component, matching
/// the behavior callers expect when orbiting over the poles.
pub fn look_at(eye: Vec3, target: Vec3) -> Mat4 {
    let forward = normalize(target - eye);
    let up = if forward.x == 0.0 && forward.z == 0.0 {
        if forward.y < 0.0 {
            Vec3::new(0.0, 0.0, -1.0)
        } else {
            Vec3::new(0.0, 0.0, 1.0)
        }
    } else {
        Vec3::Y
    };
    Mat4::look_at_rh(eye, target, up)
}

/// `look_at` with an explicit up vector. The caller is responsible for
/// picking an up vector that is not parallel to the view direction.
pub fn look_at_up(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// Symmetric perspective projection. `fovy` is the vertical field of
/// view in degrees. View-space depth `near` maps to clip z/w = 0 and
/// `far` maps to 1.
pub fn perspective(fovy_degrees: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    assert!(near > 0.0 && far > near, "need 0 < near < far");
    Mat4::perspective_rh(fovy_degrees.to_radians(), aspect, near, far)
}

/// Euler rotation in degrees, composed as `yaw * roll * pitch`. The
/// order is a fixed design choice, not configurable.
pub fn rotate(pitch: f32, yaw: f32, roll: f32) -> Mat4 {
    Mat4::from_rotation_y(yaw.to_radians())
        * Mat4::from_rotation_z(roll.to_radians())
        * Mat4::from_rotation_x(pitch.to_radians())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    fn view_basis(m: Mat4) -> (Vec3, Vec3, Vec3) {
        // Rows of the rotation block are the camera basis vectors.
        let t = m.transpose();
        (
            t.col(0).truncate(),
            t.col(1).truncate(),
            t.col(2).truncate(),
        )
    }

    fn assert_orthonormal(m: Mat4) {
        let (x, y, z) = view_basis(m);
        assert!((x.length() - 1.0).abs() < EPS);
        assert!((y.length() - 1.0).abs() < EPS);
        assert!((z.length() - 1.0).abs() < EPS);
        assert!(x.dot(y).abs() < EPS);
        assert!(x.dot(z).abs() < EPS);
        assert!(y.dot(z).abs() < EPS);
    }

    #[test]
    fn look_at_basis_is_orthonormal() {
        assert_orthonormal(look_at(Vec3::new(2.0, 1.0, 2.0), Vec3::new(0.0, 0.5, 0.0)));
        assert_orthonormal(look_at(Vec3::new(-5.0, 0.2, 3.0), Vec3::ZERO));
    }

    #[test]
    fn look_at_handles_vertical_view_direction() {
        // Target directly above and directly below the eye would make the
        // default up degenerate; both must still yield a valid basis.
        assert_orthonormal(look_at(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0)));
        assert_orthonormal(look_at(Vec3::new(1.0, 10.0, 1.0), Vec3::new(1.0, -3.0, 1.0)));
    }

    #[test]
    fn look_at_preserves_eye_distance() {
        let eye = Vec3::new(3.0, 2.0, -1.0);
        let view = look_at(eye, Vec3::ZERO);
        // The eye itself lands at the view-space origin.
        let p = view * eye.extend(1.0);
        assert!(p.truncate().length() < EPS);
    }

    #[test]
    fn perspective_maps_near_and_far_planes() {
        let p = perspective(45.0, 16.0 / 9.0, 0.1, 100.0);

        let near = p * Vec4::new(0.0, 0.0, -0.1, 1.0);
        assert!((near.z / near.w).abs() < EPS);

        let far = p * Vec4::new(0.0, 0.0, -100.0, 1.0);
        assert!((far.z / far.w - 1.0).abs() < EPS);
    }

    #[test]
    fn perspective_depth_is_monotonic() {
        let p = perspective(60.0, 1.0, 0.5, 50.0);
        let mut last = -1.0f32;
        for i in 1..=20 {
            let z = -(0.5 + (50.0 - 0.5) * i as f32 / 20.0);
            let c = p * Vec4::new(0.0, 0.0, z, 1.0);
            let ndc = c.z / c.w;
            assert!(ndc > last, "depth mapping reversed at z={z}");
            last = ndc;
        }
    }

    #[test]
    fn matrix_product_composes_with_vectors() {
        let a = rotate(30.0, 45.0, 0.0);
        let b = perspective(45.0, 1.0, 0.1, 10.0);
        let v = Vec4::new(0.3, -0.7, -2.0, 1.0);
        let lhs = (b * a) * v;
        let rhs = b * (a * v);
        assert!((lhs - rhs).length() < EPS);
    }

    #[test]
    fn rotate_yaw_turns_x_toward_negative_z() {
        let m = rotate(0.0, 90.0, 0.0);
        let v = (m * Vec4::X).truncate();
        assert!((v - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn rotate_composition_order_is_yaw_roll_pitch() {
        let pitch = 10.0;
        let yaw = 20.0;
        let roll = 30.0;
        let composed = rotate(pitch, yaw, roll);
        let manual = Mat4::from_rotation_y(yaw.to_radians())
            * Mat4::from_rotation_z(roll.to_radians())
            * Mat4::from_rotation_x(pitch.to_radians());
        assert!(composed.abs_diff_eq(manual, 1e-6));
    }

    #[test]
    #[should_panic]
    fn normalize_zero_vector_panics() {
        normalize(Vec3::ZERO);
    }
}
