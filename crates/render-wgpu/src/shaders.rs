/// WGSL shader for lit meshes: one standard (metal/rough) material per
/// instance, up to `MAX_LIGHTS` lights of mixed kinds.
pub const MESH_SHADER: &str = r#"
const PI: f32 = 3.141592653589793;
const MAX_LIGHTS: u32 = 16u;

const KIND_AMBIENT: u32 = 0u;
const KIND_DIRECTIONAL: u32 = 1u;
const KIND_HEMISPHERE: u32 = 2u;
const KIND_POINT: u32 = 3u;
const KIND_SPOT: u32 = 4u;
const KIND_RECT_AREA: u32 = 5u;

struct Globals {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    light_count: vec4<u32>,
};

struct Light {
    // rgb = linear color * intensity
    color: vec4<f32>,
    // xyz = world position, w = cutoff distance (0 = none)
    position: vec4<f32>,
    // xyz = direction the light travels, w = decay exponent
    direction: vec4<f32>,
    // hemisphere: ground color; spot: x = cos(angle), y = cos(inner angle);
    // rect: xyz = half-width axis
    extra: vec4<f32>,
    // rect: xyz = half-height axis
    axis: vec4<f32>,
    kind: vec4<u32>,
};

struct Lights {
    items: array<Light, MAX_LIGHTS>,
};

@group(0) @binding(0)
var<uniform> globals: Globals;

@group(0) @binding(1)
var<uniform> lights: Lights;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) normal_0: vec4<f32>,
    @location(7) normal_1: vec4<f32>,
    @location(8) normal_2: vec4<f32>,
    @location(9) color: vec4<f32>,
    // x = roughness, y = metalness
    @location(10) surface: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) surface: vec4<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let normal_matrix = mat3x3<f32>(
        instance.normal_0.xyz,
        instance.normal_1.xyz,
        instance.normal_2.xyz,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);

    var out: VertexOutput;
    out.clip_position = globals.view_proj * world_pos;
    out.world_position = world_pos.xyz;
    out.world_normal = normalize(normal_matrix * vertex.normal);
    out.color = instance.color;
    out.surface = instance.surface;
    return out;
}

struct Surface {
    normal: vec3<f32>,
    view: vec3<f32>,
    diffuse: vec3<f32>,
    specular: vec3<f32>,
    alpha: f32,
};

fn distance_falloff(d: f32, cutoff: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(d, decay), 0.01);
    if (cutoff > 0.0) {
        let r = d / cutoff;
        let fade = clamp(1.0 - r * r * r * r, 0.0, 1.0);
        falloff = falloff * fade * fade;
    }
    return falloff;
}

// Direct lighting for unit vector `l` towards the light with incoming
// irradiance `irradiance` (before the cosine term).
fn shade_direct(s: Surface, l: vec3<f32>, irradiance: vec3<f32>) -> vec3<f32> {
    let n_dot_l = clamp(dot(s.normal, l), 0.0, 1.0);
    if (n_dot_l <= 0.0) {
        return vec3<f32>(0.0);
    }
    let h = normalize(l + s.view);
    let n_dot_v = clamp(abs(dot(s.normal, s.view)), 1e-4, 1.0);
    let n_dot_h = clamp(dot(s.normal, h), 0.0, 1.0);
    let v_dot_h = clamp(dot(s.view, h), 0.0, 1.0);

    let a2 = s.alpha * s.alpha;
    let fresnel = s.specular + (vec3<f32>(1.0) - s.specular) * pow(1.0 - v_dot_h, 5.0);
    let gv = n_dot_l * sqrt(a2 + (1.0 - a2) * n_dot_v * n_dot_v);
    let gl = n_dot_v * sqrt(a2 + (1.0 - a2) * n_dot_l * n_dot_l);
    let visibility = 0.5 / max(gv + gl, 1e-6);
    let denom = n_dot_h * n_dot_h * (a2 - 1.0) + 1.0;
    let distribution = a2 / (PI * denom * denom);

    let radiance = irradiance * n_dot_l;
    return radiance * (s.diffuse / PI + fresnel * visibility * distribution);
}

fn closest_point_on_rect(p: vec3<f32>, center: vec3<f32>, half_w: vec3<f32>, half_h: vec3<f32>) -> vec3<f32> {
    let d = p - center;
    let w_len2 = max(dot(half_w, half_w), 1e-8);
    let h_len2 = max(dot(half_h, half_h), 1e-8);
    let u = clamp(dot(d, half_w) / w_len2, -1.0, 1.0);
    let v = clamp(dot(d, half_h) / h_len2, -1.0, 1.0);
    return center + half_w * u + half_h * v;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let roughness = max(in.surface.x, 0.0525);
    let metalness = clamp(in.surface.y, 0.0, 1.0);

    var s: Surface;
    s.normal = normalize(in.world_normal);
    s.view = normalize(globals.camera_position.xyz - in.world_position);
    s.diffuse = in.color.rgb * (1.0 - metalness);
    s.specular = mix(vec3<f32>(0.04), in.color.rgb, metalness);
    s.alpha = roughness * roughness;

    var indirect = vec3<f32>(0.0);
    var direct = vec3<f32>(0.0);

    let count = min(globals.light_count.x, MAX_LIGHTS);
    for (var i = 0u; i < count; i = i + 1u) {
        let light = lights.items[i];
        let kind = light.kind.x;

        if (kind == KIND_AMBIENT) {
            indirect = indirect + light.color.rgb;
        } else if (kind == KIND_HEMISPHERE) {
            let weight = 0.5 * dot(s.normal, vec3<f32>(0.0, 1.0, 0.0)) + 0.5;
            indirect = indirect + mix(light.extra.rgb, light.color.rgb, weight);
        } else if (kind == KIND_DIRECTIONAL) {
            direct = direct + shade_direct(s, -light.direction.xyz, light.color.rgb);
        } else if (kind == KIND_POINT || kind == KIND_SPOT) {
            let to_light = light.position.xyz - in.world_position;
            let d = length(to_light);
            let l = to_light / max(d, 1e-6);
            var irradiance = light.color.rgb * distance_falloff(d, light.position.w, light.direction.w);
            if (kind == KIND_SPOT) {
                let angle_cos = dot(-l, light.direction.xyz);
                irradiance = irradiance * smoothstep(light.extra.x, light.extra.y, angle_cos);
            }
            direct = direct + shade_direct(s, l, irradiance);
        } else if (kind == KIND_RECT_AREA) {
            let p = closest_point_on_rect(in.world_position, light.position.xyz, light.extra.xyz, light.axis.xyz);
            let to_light = p - in.world_position;
            let d2 = max(dot(to_light, to_light), 1e-4);
            let l = to_light * inverseSqrt(d2);
            let facing = max(dot(-l, light.direction.xyz), 0.0);
            let area = 4.0 * length(light.extra.xyz) * length(light.axis.xyz);
            let solid_angle = min(area * facing / d2, 2.0 * PI);
            direct = direct + shade_direct(s, l, light.color.rgb * solid_angle);
        }
    }

    let color = direct + indirect * s.diffuse / PI;
    return vec4<f32>(color, 1.0);
}
"#;

/// WGSL shader that stretches the offscreen scene target over the surface.
pub const BLIT_SHADER: &str = r#"
@group(0) @binding(0)
var scene_texture: texture_2d<f32>;

@group(0) @binding(1)
var scene_sampler: sampler;

struct BlitOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_blit(@builtin(vertex_index) index: u32) -> BlitOutput {
    // One triangle covering the viewport.
    let x = f32((index << 1u) & 2u);
    let y = f32(index & 2u);
    var out: BlitOutput;
    out.clip_position = vec4<f32>(x * 2.0 - 1.0, 1.0 - y * 2.0, 0.0, 1.0);
    out.uv = vec2<f32>(x, y);
    return out;
}

@fragment
fn fs_blit(in: BlitOutput) -> @location(0) vec4<f32> {
    return textureSample(scene_texture, scene_sampler, in.uv);
}
"#;
