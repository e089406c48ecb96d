//! Polyline stroking.
//!
//! Strokes are tessellated around the centre line without applying the line
//! width in map space. Each vertex keeps its point on the path in `position`
//! and carries the half-width extrusion in `norm` (logical pixels); the line
//! shader scales `norm` by the view resolution, so widths stay constant on
//! screen at any zoom.

use std::fmt;

use lyon::geom::point;
use lyon::path::Path;
use lyon::tessellation::{
    BuffersBuilder, LineCap as LyonCap, LineJoin as LyonJoin, StrokeOptions, StrokeTessellator,
    StrokeVertex, VertexBuffers,
};

use crate::coords::Vec2;
use crate::paint::{LineCap, LineJoin, Stroke};
use crate::render::line::LineVertex;

/// Indexed triangle list ready for `LineRenderer`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineMesh {
    pub vertices: Vec<LineVertex>,
    pub indices: Vec<u32>,
}

impl LineMesh {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Appends `other`, rebasing its indices past the current vertices.
    pub fn append(&mut self, other: &LineMesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TessellateError {
    /// A point coordinate or the stroke width is NaN or infinite.
    NonFinite,
    /// lyon rejected the path.
    Tessellation(String),
}

impl fmt::Display for TessellateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TessellateError::NonFinite => write!(f, "polyline has a non-finite coordinate or width"),
            TessellateError::Tessellation(msg) => write!(f, "stroke tessellation failed: {msg}"),
        }
    }
}

impl std::error::Error for TessellateError {}

/// Reusable stroke tessellator.
pub struct LineTessellator {
    inner: StrokeTessellator,
    tolerance: f32,
}

impl LineTessellator {
    pub fn new() -> Self {
        Self {
            inner: StrokeTessellator::new(),
            tolerance: StrokeOptions::DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f32) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Strokes `points` into a fresh mesh.
    pub fn tessellate(
        &mut self,
        points: &[Vec2],
        closed: bool,
        stroke: &Stroke,
    ) -> Result<LineMesh, TessellateError> {
        let mut mesh = LineMesh::new();
        self.tessellate_into(points, closed, stroke, &mut mesh)?;
        Ok(mesh)
    }

    /// Strokes `points` and appends the result to `out`.
    ///
    /// Fewer than two points, or a non-positive width, append nothing. On
    /// error `out` is left untouched.
    pub fn tessellate_into(
        &mut self,
        points: &[Vec2],
        closed: bool,
        stroke: &Stroke,
        out: &mut LineMesh,
    ) -> Result<(), TessellateError> {
        if !stroke.width.is_finite() || points.iter().any(|p| !p.is_finite()) {
            return Err(TessellateError::NonFinite);
        }
        if points.len() < 2 || stroke.width <= 0.0 {
            return Ok(());
        }

        let path = build_path(points, closed);
        let half_width = stroke.width * 0.5;
        let color = stroke.color.to_array();

        // Width 1 keeps lyon's normals unit-scaled in path space; the real
        // width is applied to `norm` in pixels.
        let options = StrokeOptions::default()
            .with_tolerance(self.tolerance)
            .with_line_width(1.0)
            .with_line_cap(to_lyon_cap(stroke.cap))
            .with_line_join(to_lyon_join(stroke.join));

        let mut buffers: VertexBuffers<LineVertex, u32> = VertexBuffers::new();
        self.inner
            .tessellate_path(
                &path,
                &options,
                &mut BuffersBuilder::new(&mut buffers, |v: StrokeVertex| {
                    let p = v.position_on_path();
                    let n = v.normal() * half_width;
                    LineVertex::new([p.x, p.y], color, [n.x, n.y])
                }),
            )
            .map_err(|e| TessellateError::Tessellation(format!("{e:?}")))?;

        let base = out.vertices.len() as u32;
        out.vertices.extend(buffers.vertices);
        out.indices.extend(buffers.indices.iter().map(|i| i + base));
        Ok(())
    }
}

impl Default for LineTessellator {
    fn default() -> Self {
        Self::new()
    }
}

fn build_path(points: &[Vec2], closed: bool) -> Path {
    let mut builder = Path::builder();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        builder.begin(point(first.x, first.y));
        for p in iter {
            builder.line_to(point(p.x, p.y));
        }
        builder.end(closed);
    }
    builder.build()
}

fn to_lyon_cap(cap: LineCap) -> LyonCap {
    match cap {
        LineCap::Butt => LyonCap::Butt,
        LineCap::Square => LyonCap::Square,
        LineCap::Round => LyonCap::Round,
    }
}

fn to_lyon_join(join: LineJoin) -> LyonJoin {
    match join {
        LineJoin::Miter => LyonJoin::Miter,
        LineJoin::MiterClip => LyonJoin::MiterClip,
        LineJoin::Round => LyonJoin::Round,
        LineJoin::Bevel => LyonJoin::Bevel,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paint::Color;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn horizontal_segment_extrudes_by_half_width() {
        let mut t = LineTessellator::new();
        let stroke = Stroke::new(4.0, Color::RED);
        let mesh = t.tessellate(&[v(0.0, 0.0), v(10.0, 0.0)], false, &stroke).unwrap();

        assert!(!mesh.is_empty());
        assert_eq!(mesh.indices.len() % 3, 0);
        for vert in &mesh.vertices {
            assert!(close(vert.norm[0], 0.0), "{vert:?}");
            assert!(close(vert.norm[1].abs(), 2.0), "{vert:?}");
            assert_eq!(vert.position[1], 0.0);
            assert_eq!(vert.color, [1.0, 0.0, 0.0, 1.0]);
        }
        assert!(mesh.vertices.iter().any(|v| v.norm[1] > 0.0));
        assert!(mesh.vertices.iter().any(|v| v.norm[1] < 0.0));
    }

    #[test]
    fn norm_matches_lyon_extrusion() {
        let points = [v(0.0, 0.0), v(20.0, 0.0), v(20.0, 15.0), v(40.0, 5.0)];
        let stroke = Stroke::new(6.0, Color::BLACK)
            .with_cap(LineCap::Square)
            .with_join(LineJoin::Bevel);

        let mesh = LineTessellator::new()
            .tessellate(&points, false, &stroke)
            .unwrap();

        // Same path stroked by lyon at the real width.
        let path = build_path(&points, false);
        let options = StrokeOptions::default()
            .with_line_width(6.0)
            .with_line_cap(LyonCap::Square)
            .with_line_join(LyonJoin::Bevel);
        let mut expected: VertexBuffers<[f32; 2], u32> = VertexBuffers::new();
        StrokeTessellator::new()
            .tessellate_path(
                &path,
                &options,
                &mut BuffersBuilder::new(&mut expected, |v: StrokeVertex| {
                    let p = v.position();
                    [p.x, p.y]
                }),
            )
            .unwrap();

        assert_eq!(mesh.vertices.len(), expected.vertices.len());
        assert_eq!(mesh.indices, expected.indices);
        for (got, want) in mesh.vertices.iter().zip(&expected.vertices) {
            let x = got.position[0] + got.norm[0];
            let y = got.position[1] + got.norm[1];
            assert!(close(x, want[0]) && close(y, want[1]), "{got:?} vs {want:?}");
        }
    }

    #[test]
    fn degenerate_input_gives_empty_mesh() {
        let mut t = LineTessellator::new();
        let stroke = Stroke::default();
        assert!(t.tessellate(&[], false, &stroke).unwrap().is_empty());
        assert!(t.tessellate(&[v(1.0, 1.0)], false, &stroke).unwrap().is_empty());

        let line = [v(0.0, 0.0), v(5.0, 0.0)];
        for width in [0.0, -1.0] {
            let stroke = Stroke::new(width, Color::BLACK);
            assert!(t.tessellate(&line, false, &stroke).unwrap().is_empty(), "{width}");
            assert!(t.tessellate(&line, true, &stroke).unwrap().is_empty(), "{width}");
        }
    }

    #[test]
    fn non_finite_input_is_an_error() {
        let mut t = LineTessellator::new();
        let stroke = Stroke::default();
        let err = t
            .tessellate(&[v(0.0, 0.0), v(f32::NAN, 1.0)], false, &stroke)
            .unwrap_err();
        assert_eq!(err, TessellateError::NonFinite);

        let wide = Stroke::new(f32::INFINITY, Color::BLACK);
        assert!(t.tessellate(&[v(0.0, 0.0), v(1.0, 0.0)], false, &wide).is_err());
    }

    #[test]
    fn tessellate_into_rebases_indices() {
        let mut t = LineTessellator::new();
        let stroke = Stroke::new(2.0, Color::WHITE);
        let mut mesh = LineMesh::new();

        t.tessellate_into(&[v(0.0, 0.0), v(1.0, 0.0)], false, &stroke, &mut mesh).unwrap();
        let first = mesh.vertices.len() as u32;
        t.tessellate_into(&[v(0.0, 5.0), v(1.0, 5.0)], false, &stroke, &mut mesh).unwrap();

        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
        assert!(mesh.indices.iter().any(|&i| i >= first));
    }

    #[test]
    fn closing_joins_the_first_corner() {
        let square = [v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)];
        let stroke = Stroke::new(2.0, Color::BLACK);
        let mut t = LineTessellator::new();

        let at_start = |m: &LineMesh| -> Vec<[f32; 2]> {
            m.vertices
                .iter()
                .filter(|v| v.position == [0.0, 0.0])
                .map(|v| v.norm)
                .collect()
        };

        // Open: butt cap, extrusion perpendicular to the first segment.
        let open = t.tessellate(&square, false, &stroke).unwrap();
        let norms = at_start(&open);
        assert!(!norms.is_empty());
        assert!(norms.iter().all(|n| close(n[0], 0.0)));

        // Closed: mitred corner, extrusion along the diagonal.
        let closed = t.tessellate(&square, true, &stroke).unwrap();
        let norms = at_start(&closed);
        assert!(!norms.is_empty());
        assert!(norms.iter().any(|n| !close(n[0], 0.0) && !close(n[1], 0.0)));
    }

    #[test]
    fn append_rebases() {
        let a = LineMesh {
            vertices: vec![LineVertex::default(); 3],
            indices: vec![0, 1, 2],
        };
        let mut m = a.clone();
        m.append(&a);
        assert_eq!(m.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(m.vertices.len(), 6);
    }
}
