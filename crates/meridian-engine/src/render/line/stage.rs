//! CPU rendition of the line shader stages.
//!
//! Follows `shaders/line.wgsl` operation for operation, so host code (tests,
//! hit-testing) sees the same clip positions the GPU produces.

use super::records::{LineVertex, ViewUniform};

/// Vertex stage output / fragment stage input.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct VertexOutput {
    pub clip_position: [f32; 4],
    pub color: [f32; 4],
}

/// `vs_main`: displaces `position` by `norm * resolution` and projects it.
pub fn vertex_stage(input: &LineVertex, view: &ViewUniform) -> VertexOutput {
    let [px, py] = input.position;
    let [nx, ny] = input.norm;
    let r = view.resolution;

    // Scale first, then add; no fused forms.
    let x = px + nx * r;
    let y = py + ny * r;
    let (z, w) = (0.0, 1.0);

    let m = &view.view_proj;
    let row = |i: usize| m[0][i] * x + m[1][i] * y + m[2][i] * z + m[3][i] * w;

    VertexOutput {
        clip_position: [row(0), row(1), row(2), row(3)],
        color: input.color,
    }
}

/// `fs_main`: the interpolated color is the output color.
#[inline]
pub fn fragment_stage(input: &VertexOutput) -> [f32; 4] {
    input.color
}

/// Linear interpolation of the three vertex outputs of a triangle, as the
/// rasterizer does for `w = 1`.
///
/// `barycentric` must sum to one; only its last two weights are read, as
/// `c0 + b1 * (c1 - c0) + b2 * (c2 - c0)`, which reproduces a constant
/// attribute exactly.
pub fn interpolate(outputs: &[VertexOutput; 3], barycentric: [f32; 3]) -> VertexOutput {
    let [_, b1, b2] = barycentric;
    let lerp = |a: [f32; 4], b: [f32; 4], c: [f32; 4]| -> [f32; 4] {
        std::array::from_fn(|i| a[i] + b1 * (b[i] - a[i]) + b2 * (c[i] - a[i]))
    };

    let [o0, o1, o2] = outputs;
    VertexOutput {
        clip_position: lerp(o0.clip_position, o1.clip_position, o2.clip_position),
        color: lerp(o0.color, o1.color, o2.color),
    }
}
