//! Embedded WGSL for every pipeline. Each constant is a complete,
//! standalone module so a compile failure names exactly one stage. The
//! `Globals` struct repeats per module and matches
//! `uniforms::GlobalUniforms` byte for byte.

/// Depth prepass: positions only, no fragment stage.
pub const DEPTH_VS: &str = "
struct Globals {
    clip: vec4<f32>,
    camera_pos: vec4<f32>,
    material_props: vec4<f32>,
    view: mat4x4<f32>,
    perspective: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> globals: Globals;

struct Object {
    model_to_world: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
};
@group(1) @binding(0) var<uniform> object: Object;

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> @builtin(position) vec4<f32> {
    let world_pos = object.model_to_world * vec4<f32>(position, 1.0);
    return globals.perspective * globals.view * world_pos;
}
";

pub const PBR_VS: &str = "
struct Globals {
    clip: vec4<f32>,
    camera_pos: vec4<f32>,
    material_props: vec4<f32>,
    view: mat4x4<f32>,
    perspective: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> globals: Globals;

struct Object {
    model_to_world: mat4x4<f32>,
    normal_matrix: mat4x4<f32>,
};
@group(1) @binding(0) var<uniform> object: Object;

struct VsIn {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) tangent: vec3<f32>,
    @location(3) bitangent: vec3<f32>,
    @location(4) uv: vec2<f32>,
};

struct VsOut {
    @builtin(position) clip_pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) tangent: vec3<f32>,
    @location(4) bitangent: vec3<f32>,
};

@vertex
fn vs_main(in: VsIn) -> VsOut {
    var out: VsOut;
    let world_pos = object.model_to_world * vec4<f32>(in.position, 1.0);
    out.clip_pos = globals.perspective * globals.view * world_pos;
    out.uv = in.uv;
    out.world_pos = world_pos.xyz;

    let nmat = mat3x3<f32>(
        object.normal_matrix[0].xyz,
        object.normal_matrix[1].xyz,
        object.normal_matrix[2].xyz,
    );
    out.normal = normalize(nmat * in.normal);
    out.tangent = normalize(nmat * in.tangent);
    out.bitangent = normalize(nmat * in.bitangent);
    return out;
}
";

/// Cook-Torrance direct lighting under one fixed light, plus an
/// ambient term and an exposure tone-map. Output stays linear; the
/// sRGB render target applies the transfer function.
pub const PBR_FS: &str = "
struct Globals {
    clip: vec4<f32>,
    camera_pos: vec4<f32>,
    material_props: vec4<f32>,
    view: mat4x4<f32>,
    perspective: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> globals: Globals;

struct Material {
    props: vec4<f32>,
};

@group(2) @binding(0) var diffuse_tex: texture_2d<f32>;
@group(2) @binding(1) var tex_sampler: sampler;
@group(2) @binding(2) var normal_tex: texture_2d<f32>;
@group(2) @binding(3) var<uniform> material: Material;

const PI: f32 = 3.14159;

fn gsub(normal: vec3<f32>, dir: vec3<f32>, k: f32) -> f32 {
    let ndotd = max(dot(normal, dir), 0.0);
    return ndotd / (ndotd * (1.0 - k) + k);
}

fn ggx(normal: vec3<f32>, view_dir: vec3<f32>, light_dir: vec3<f32>, alpha: f32) -> f32 {
    let k = ((alpha + 1.0) * (alpha + 1.0)) / 8.0;
    return gsub(normal, light_dir, k) * gsub(normal, view_dir, k);
}

fn trggx(normal: vec3<f32>, half_dir: vec3<f32>, alpha: f32) -> f32 {
    let a2 = alpha * alpha * alpha * alpha;
    let ndoth = max(dot(normal, half_dir), 0.0);
    let inner_denom = ((ndoth * ndoth) * (a2 - 1.0)) + 1.0;
    return a2 / (PI * (inner_denom * inner_denom));
}

fn fresn(cos_t: f32, color: vec3<f32>, metalness: f32) -> vec3<f32> {
    let f0 = mix(vec3<f32>(0.04), color, metalness);
    return f0 + (1.0 - f0) * pow(clamp(1.0 - cos_t, 0.0, 1.0), 5.0);
}

fn brdf(
    normal: vec3<f32>,
    light_dir: vec3<f32>,
    view_dir: vec3<f32>,
    half_dir: vec3<f32>,
    albedo: vec3<f32>,
    alpha: f32,
    metalness: f32,
) -> vec3<f32> {
    let lambert = albedo / PI;

    let d = trggx(normal, half_dir, alpha);
    let g = ggx(normal, view_dir, light_dir, alpha);
    let cos_t = max(dot(half_dir, view_dir), 0.0);
    let f = fresn(cos_t, albedo, metalness);
    let num = d * f * g;
    let denom = 4.0 * max(dot(normal, view_dir), 0.0) * max(dot(normal, light_dir), 0.0);

    let kd = (1.0 - metalness) * (vec3<f32>(1.0) - f);

    return kd * lambert + (num / (denom + 0.0001));
}

struct FsIn {
    @location(0) uv: vec2<f32>,
    @location(1) world_pos: vec3<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) tangent: vec3<f32>,
    @location(4) bitangent: vec3<f32>,
};

@fragment
fn fs_main(in: FsIn) -> @location(0) vec4<f32> {
    let light_color = vec3<f32>(14.0, 14.0, 9.3);
    let light_dir = normalize(vec3<f32>(-20.0, 20.0, -20.0));
    let view_dir = normalize(globals.camera_pos.xyz - in.world_pos);

    let roughness = material.props.x;
    let metalness = material.props.y;

    var mapped_norm: vec3<f32>;
    if (material.props.z > 0.5) {
        var sampled = textureSample(normal_tex, tex_sampler, in.uv).rgb;
        sampled = (sampled * 2.0) - 1.0;
        let tan_cob = mat3x3<f32>(in.tangent, in.bitangent, in.normal);
        mapped_norm = normalize(tan_cob * sampled);
    } else {
        mapped_norm = normalize(in.normal);
    }

    let half_dir = normalize(view_dir + light_dir);

    let color = textureSample(diffuse_tex, tex_sampler, in.uv);
    let ambient = vec3<f32>(0.0, 0.1, 0.2) * color.rgb;

    var final_color = brdf(mapped_norm, light_dir, view_dir, half_dir, color.rgb, roughness, metalness)
        * light_color
        * max(dot(light_dir, mapped_norm), 0.0)
        + ambient;

    let exposure = 0.7;
    final_color = vec3<f32>(1.0) - exp(-final_color * exposure);

    return vec4<f32>(final_color, color.a);
}
";

/// View translation is dropped (w = 0 position) and clip z pinned to w,
/// so the cube sits exactly at the far plane behind all geometry.
pub const SKYBOX_VS: &str = "
struct Globals {
    clip: vec4<f32>,
    camera_pos: vec4<f32>,
    material_props: vec4<f32>,
    view: mat4x4<f32>,
    perspective: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> globals: Globals;

struct VsOut {
    @builtin(position) clip_pos: vec4<f32>,
    @location(0) dir: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VsOut {
    var out: VsOut;
    let pos = globals.perspective * globals.view * vec4<f32>(position, 0.0);
    out.clip_pos = vec4<f32>(pos.x, pos.y, pos.w, pos.w);
    out.dir = position;
    return out;
}
";

pub const SKYBOX_FS: &str = "
@group(1) @binding(0) var cube_tex: texture_cube<f32>;
@group(1) @binding(1) var cube_sampler: sampler;

@fragment
fn fs_main(@location(0) dir: vec3<f32>) -> @location(0) vec4<f32> {
    let color = textureSample(cube_tex, cube_sampler, dir).rgb;
    return vec4<f32>(color / (color + 1.0), 1.0);
}
";

pub const BAKE_VS: &str = "
struct Bake {
    view: mat4x4<f32>,
    projection: mat4x4<f32>,
};
@group(0) @binding(0) var<uniform> bake: Bake;

struct VsOut {
    @builtin(position) clip_pos: vec4<f32>,
    @location(0) dir: vec3<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VsOut {
    var out: VsOut;
    out.clip_pos = bake.projection * bake.view * vec4<f32>(position, 1.0);
    out.dir = position;
    return out;
}
";

/// Spherical lookup into the equirectangular source. The source is a
/// 32-bit float texture sampled without filtering.
pub const BAKE_FS: &str = "
@group(1) @binding(0) var equirect_tex: texture_2d<f32>;
@group(1) @binding(1) var equirect_sampler: sampler;

const INV_ATAN: vec2<f32> = vec2<f32>(0.1591, 0.3183);

fn sample_spherical(v: vec3<f32>) -> vec2<f32> {
    var uv = vec2<f32>(atan2(v.z, v.x), asin(v.y));
    uv = uv * INV_ATAN;
    uv = uv + 0.5;
    return uv;
}

@fragment
fn fs_main(@location(0) dir: vec3<f32>) -> @location(0) vec4<f32> {
    let uv = sample_spherical(normalize(dir));
    return vec4<f32>(textureSample(equirect_tex, equirect_sampler, uv).rgb, 1.0);
}
";

pub const BLIT_VS: &str = "
struct VsOut {
    @builtin(position) clip_pos: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>, @location(1) uv: vec2<f32>) -> VsOut {
    var out: VsOut;
    out.clip_pos = vec4<f32>(position, 1.0);
    out.uv = uv;
    return out;
}
";

pub const BLIT_FS: &str = "
@group(0) @binding(0) var scene_tex: texture_2d<f32>;
@group(0) @binding(1) var scene_sampler: sampler;

@fragment
fn fs_main(@location(0) uv: vec2<f32>) -> @location(0) vec4<f32> {
    return textureSample(scene_tex, scene_sampler, uv);
}
";

#[cfg(test)]
mod tests {
    //! CPU mirrors of the lighting functions in `PBR_FS`, kept in step
    //! with the shader text so its properties can run without a device.

    use glam::Vec3;

    const PI: f32 = 3.14159;
    const LIGHT_COLOR: Vec3 = Vec3::new(14.0, 14.0, 9.3);
    const AMBIENT: Vec3 = Vec3::new(0.0, 0.1, 0.2);
    const EXPOSURE: f32 = 0.7;

    fn gsub(normal: Vec3, dir: Vec3, k: f32) -> f32 {
        let ndotd = normal.dot(dir).max(0.0);
        ndotd / (ndotd * (1.0 - k) + k)
    }

    fn ggx(normal: Vec3, view_dir: Vec3, light_dir: Vec3, alpha: f32) -> f32 {
        let k = ((alpha + 1.0) * (alpha + 1.0)) / 8.0;
        gsub(normal, light_dir, k) * gsub(normal, view_dir, k)
    }

    fn trggx(normal: Vec3, half_dir: Vec3, alpha: f32) -> f32 {
        let a2 = alpha * alpha * alpha * alpha;
        let ndoth = normal.dot(half_dir).max(0.0);
        let inner_denom = ((ndoth * ndoth) * (a2 - 1.0)) + 1.0;
        a2 / (PI * (inner_denom * inner_denom))
    }

    fn fresn(cos_t: f32, color: Vec3, metalness: f32) -> Vec3 {
        let f0 = Vec3::splat(0.04).lerp(color, metalness);
        f0 + (Vec3::ONE - f0) * (1.0 - cos_t).clamp(0.0, 1.0).powi(5)
    }

    fn brdf(
        normal: Vec3,
        light_dir: Vec3,
        view_dir: Vec3,
        half_dir: Vec3,
        albedo: Vec3,
        alpha: f32,
        metalness: f32,
    ) -> Vec3 {
        let lambert = albedo / PI;
        let d = trggx(normal, half_dir, alpha);
        let g = ggx(normal, view_dir, light_dir, alpha);
        let cos_t = half_dir.dot(view_dir).max(0.0);
        let f = fresn(cos_t, albedo, metalness);
        let num = d * f * g;
        let denom = 4.0 * normal.dot(view_dir).max(0.0) * normal.dot(light_dir).max(0.0);
        let kd = (1.0 - metalness) * (Vec3::ONE - f);
        kd * lambert + (num / (denom + 0.0001))
    }

    /// Full fragment path for one shaded point: direct term when lit,
    /// ambient either way, then the exposure curve.
    fn shade(normal: Vec3, albedo: Vec3, roughness: f32, metalness: f32, lit: bool) -> Vec3 {
        let light_dir = Vec3::new(-20.0, 20.0, -20.0).normalize();
        let view_dir = light_dir;
        let half_dir = (view_dir + light_dir).normalize();
        let ambient = AMBIENT * albedo;
        let direct = if lit {
            brdf(normal, light_dir, view_dir, half_dir, albedo, roughness, metalness)
                * LIGHT_COLOR
                * light_dir.dot(normal).max(0.0)
        } else {
            Vec3::ZERO
        };
        let c = direct + ambient;
        Vec3::ONE - (-c * EXPOSURE).exp()
    }

    fn luminance(c: Vec3) -> f32 {
        c.dot(Vec3::new(0.2126, 0.7152, 0.0722))
    }

    #[test]
    fn lit_fragment_outshines_ambient_only() {
        let albedo = Vec3::new(0.8, 0.7, 0.6);
        for &(roughness, metalness) in &[(0.1, 0.0), (0.5, 0.1), (0.9, 0.9)] {
            // Surface facing the light head-on.
            let normal = Vec3::new(-20.0, 20.0, -20.0).normalize();
            let lit = shade(normal, albedo, roughness, metalness, true);
            let dark = shade(normal, albedo, roughness, metalness, false);
            assert!(
                luminance(lit) > luminance(dark),
                "lit {lit:?} not brighter than ambient {dark:?} at r={roughness} m={metalness}"
            );
        }
    }

    #[test]
    fn backfacing_fragment_keeps_only_ambient() {
        let albedo = Vec3::new(0.8, 0.7, 0.6);
        let normal = -Vec3::new(-20.0, 20.0, -20.0).normalize();
        let lit = shade(normal, albedo, 0.5, 0.0, true);
        let dark = shade(normal, albedo, 0.5, 0.0, false);
        assert!((luminance(lit) - luminance(dark)).abs() < 1e-6);
    }

    #[test]
    fn exposure_curve_stays_inside_unit_range() {
        let albedo = Vec3::ONE;
        let normal = Vec3::new(-20.0, 20.0, -20.0).normalize();
        // A sharp specular peak saturates but never exceeds 1.0.
        let peak = shade(normal, albedo, 0.05, 1.0, true);
        for ch in peak.to_array() {
            assert!((0.0..=1.0).contains(&ch), "channel {ch} out of range");
        }
        let soft = shade(normal, albedo, 0.8, 0.0, true);
        for ch in soft.to_array() {
            assert!(ch < 1.0, "rough surface saturated a channel");
        }
    }
}
