//! WGSL sources of the canvas pipelines.

/// Shared viewport uniform: pixel size of the canvas and the page color the
/// canvas is composited over when presented.
const VIEWPORT_WGSL: &str = r#"
struct Viewport {
    size: vec2<f32>,
    _pad: vec2<f32>,
    backdrop: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> viewport: Viewport;

fn to_ndc(pixel: vec2<f32>) -> vec4<f32> {
    let uv = pixel / max(viewport.size, vec2<f32>(1.0));
    return vec4<f32>(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0, 0.0, 1.0);
}
"#;

const FILL_BODY: &str = r#"
struct FillIn {
    @location(0) rect_min: vec2<f32>,
    @location(1) rect_max: vec2<f32>,
    @location(2) center: vec2<f32>,
    @location(3) radii: vec2<f32>,
    @location(4) offsets: vec4<f32>,
    @location(5) stop_count: u32,
    @location(6) c0: vec4<f32>,
    @location(7) c1: vec4<f32>,
    @location(8) c2: vec4<f32>,
    @location(9) c3: vec4<f32>,
};

struct FillOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) pixel: vec2<f32>,
    @location(1) @interpolate(flat) center: vec2<f32>,
    @location(2) @interpolate(flat) radii: vec2<f32>,
    @location(3) @interpolate(flat) offsets: vec4<f32>,
    @location(4) @interpolate(flat) stop_count: u32,
    @location(5) @interpolate(flat) c0: vec4<f32>,
    @location(6) @interpolate(flat) c1: vec4<f32>,
    @location(7) @interpolate(flat) c2: vec4<f32>,
    @location(8) @interpolate(flat) c3: vec4<f32>,
};

@vertex
fn vs_fill(@builtin(vertex_index) vertex_index: u32, inst: FillIn) -> FillOut {
    var corners = array<vec2<f32>, 6>(
        vec2<f32>(0.0, 0.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(0.0, 1.0),
        vec2<f32>(1.0, 0.0),
        vec2<f32>(1.0, 1.0),
    );
    let pixel = mix(inst.rect_min, inst.rect_max, corners[vertex_index]);

    var out: FillOut;
    out.clip_position = to_ndc(pixel);
    out.pixel = pixel;
    out.center = inst.center;
    out.radii = inst.radii;
    out.offsets = inst.offsets;
    out.stop_count = inst.stop_count;
    out.c0 = inst.c0;
    out.c1 = inst.c1;
    out.c2 = inst.c2;
    out.c3 = inst.c3;
    return out;
}

@fragment
fn fs_fill(in: FillOut) -> @location(0) vec4<f32> {
    let d = distance(in.pixel, in.center);
    if (in.radii.y >= 0.0 && d > in.radii.y) {
        discard;
    }

    let t = clamp(d / max(in.radii.x, 0.000001), 0.0, 1.0);
    var colors = array<vec4<f32>, 4>(in.c0, in.c1, in.c2, in.c3);
    let n = clamp(in.stop_count, 1u, 4u);

    var color = colors[0];
    if (t > in.offsets[0]) {
        color = colors[n - 1u];
        for (var i = 1u; i < n; i = i + 1u) {
            if (t <= in.offsets[i]) {
                let a = in.offsets[i - 1u];
                let b = in.offsets[i];
                let f = select(1.0, (t - a) / (b - a), b > a);
                color = mix(colors[i - 1u], colors[i], f);
                break;
            }
        }
    }
    return color;
}
"#;

const STROKE_BODY: &str = r#"
struct StrokeIn {
    @location(0) position: vec2<f32>,
    @location(1) color: vec4<f32>,
};

struct StrokeOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_stroke(v: StrokeIn) -> StrokeOut {
    var out: StrokeOut;
    out.clip_position = to_ndc(v.position);
    out.color = v.color;
    return out;
}

@fragment
fn fs_stroke(in: StrokeOut) -> @location(0) vec4<f32> {
    return in.color;
}
"#;

const PRESENT_BODY: &str = r#"
struct PresentOut {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@group(1) @binding(0)
var canvas: texture_2d<f32>;
@group(1) @binding(1)
var canvas_sampler: sampler;

@vertex
fn vs_present(@builtin(vertex_index) vertex_index: u32) -> PresentOut {
    var positions = array<vec2<f32>, 3>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>(3.0, -1.0),
        vec2<f32>(-1.0, 3.0),
    );
    var uvs = array<vec2<f32>, 3>(
        vec2<f32>(0.0, 1.0),
        vec2<f32>(2.0, 1.0),
        vec2<f32>(0.0, -1.0),
    );

    var out: PresentOut;
    out.clip_position = vec4<f32>(positions[vertex_index], 0.0, 1.0);
    out.uv = uvs[vertex_index];
    return out;
}

@fragment
fn fs_present(in: PresentOut) -> @location(0) vec4<f32> {
    // Blending into a transparent canvas leaves premultiplied color behind
    let c = textureSample(canvas, canvas_sampler, in.uv);
    let rgb = c.rgb + viewport.backdrop.rgb * (1.0 - c.a);
    return vec4<f32>(rgb, 1.0);
}
"#;

pub fn fill_shader() -> String {
    format!("{VIEWPORT_WGSL}{FILL_BODY}")
}

pub fn stroke_shader() -> String {
    format!("{VIEWPORT_WGSL}{STROKE_BODY}")
}

pub fn present_shader() -> String {
    format!("{VIEWPORT_WGSL}{PRESENT_BODY}")
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_fill_shader_valid() {
        let src = fill_shader();
        assert!(src.contains("fn vs_fill"));
        validate_wgsl(&src).unwrap();
    }

    #[test]
    fn test_stroke_shader_valid() {
        validate_wgsl(&stroke_shader()).unwrap();
    }

    #[test]
    fn test_present_shader_valid() {
        let src = present_shader();
        assert!(src.contains("viewport.backdrop"));
        validate_wgsl(&src).unwrap();
    }
}
