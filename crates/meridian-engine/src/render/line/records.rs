use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::view::MapView;

/// Per-draw uniform at group 0 / binding 0.
///
/// Mirrors the WGSL `ViewUniform` struct, whose alignment (16, from the
/// matrix) rounds its size up to 80 bytes.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ViewUniform {
    /// Column-major: `view_proj[c][r]` is column `c`, row `r`.
    pub view_proj: [[f32; 4]; 4],
    /// Map units per logical pixel.
    pub resolution: f32,
    pub _pad: [f32; 3],
}

impl ViewUniform {
    pub const SIZE: u64 = std::mem::size_of::<ViewUniform>() as u64;

    pub fn new(view_proj: Mat4, resolution: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            resolution,
            _pad: [0.0; 3],
        }
    }

    pub fn from_view(view: &MapView) -> Self {
        Self::new(view.view_proj(), view.resolution() as f32)
    }
}

impl Default for ViewUniform {
    fn default() -> Self {
        Self::new(Mat4::IDENTITY, 1.0)
    }
}

/// Vertex of a tessellated line.
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    /// Point on the centre line, map units.
    pub position: [f32; 2],
    /// Straight RGBA, passed through unmodified.
    pub color: [f32; 4],
    /// Extrusion in logical pixels; scaled by `ViewUniform::resolution`.
    pub norm: [f32; 2],
}

impl LineVertex {
    const ATTRS: [wgpu::VertexAttribute; 3] = wgpu::vertex_attr_array![
        0 => Float32x2, // position
        1 => Float32x4, // color
        2 => Float32x2  // norm
    ];

    #[inline]
    pub const fn new(position: [f32; 2], color: [f32; 4], norm: [f32; 2]) -> Self {
        Self {
            position,
            color,
            norm,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Layout entry for the view uniform (group 0 / binding 0).
pub fn view_bind_group_layout_entry() -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding: 0,
        visibility: wgpu::ShaderStages::VERTEX,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: wgpu::BufferSize::new(ViewUniform::SIZE),
        },
        count: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    #[test]
    fn view_uniform_matches_wgsl_layout() {
        assert_eq!(size_of::<ViewUniform>(), 80);
        assert_eq!(offset_of!(ViewUniform, view_proj), 0);
        assert_eq!(offset_of!(ViewUniform, resolution), 64);
    }

    #[test]
    fn line_vertex_layout() {
        assert_eq!(size_of::<LineVertex>(), 32);
        assert_eq!(offset_of!(LineVertex, position), 0);
        assert_eq!(offset_of!(LineVertex, color), 8);
        assert_eq!(offset_of!(LineVertex, norm), 24);

        let layout = LineVertex::layout();
        assert_eq!(layout.array_stride, 32);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);

        let attrs: Vec<(u32, u64, wgpu::VertexFormat)> = layout
            .attributes
            .iter()
            .map(|a| (a.shader_location, a.offset, a.format))
            .collect();
        assert_eq!(
            attrs,
            vec![
                (0, 0, wgpu::VertexFormat::Float32x2),
                (1, 8, wgpu::VertexFormat::Float32x4),
                (2, 24, wgpu::VertexFormat::Float32x2),
            ]
        );
    }

    #[test]
    fn bind_group_entry_is_vertex_uniform() {
        let entry = view_bind_group_layout_entry();
        assert_eq!(entry.binding, 0);
        assert_eq!(entry.visibility, wgpu::ShaderStages::VERTEX);
        match entry.ty {
            wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: Some(size),
            } => assert_eq!(size.get(), 80),
            other => panic!("unexpected binding type {other:?}"),
        }
    }

    #[test]
    fn uniform_bytes_place_resolution_after_matrix() {
        let u = ViewUniform::new(Mat4::from_scale(glam::Vec3::splat(2.0)), 0.25);
        let floats: [f32; 20] = bytemuck::cast(u);
        assert_eq!(floats[0], 2.0);
        assert_eq!(floats[15], 1.0);
        assert_eq!(floats[16], 0.25);
        assert_eq!(&floats[17..], &[0.0; 3]);
    }

    #[test]
    fn from_view_copies_projection_and_resolution() {
        let view = MapView::default().with_resolution(4.0);
        let u = ViewUniform::from_view(&view);
        assert_eq!(u.resolution, 4.0);
        assert_eq!(u.view_proj, view.view_proj().to_cols_array_2d());
    }
}
