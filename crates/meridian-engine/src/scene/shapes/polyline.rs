use crate::coords::Vec2;
use crate::paint::Stroke;
use crate::scene::{DrawCmd, DrawList, ZIndex};

/// Polyline draw payload. Points are in map units.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineCmd {
    pub points: Vec<Vec2>,
    /// Connects the last point back to the first.
    pub closed: bool,
    pub stroke: Stroke,
}

impl PolylineCmd {
    #[inline]
    pub fn new(points: Vec<Vec2>, closed: bool, stroke: Stroke) -> Self {
        Self { points, closed, stroke }
    }
}

impl DrawList {
    /// Records an open polyline.
    #[inline]
    pub fn push_polyline(&mut self, z: ZIndex, points: Vec<Vec2>, stroke: Stroke) {
        self.push(z, DrawCmd::Polyline(PolylineCmd::new(points, false, stroke)));
    }

    /// Records the outline of a polygon (closed polyline).
    #[inline]
    pub fn push_polygon_outline(&mut self, z: ZIndex, points: Vec<Vec2>, stroke: Stroke) {
        self.push(z, DrawCmd::Polyline(PolylineCmd::new(points, true, stroke)));
    }
}
