use super::Color;

/// Shape of open polyline ends.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineCap {
    #[default]
    Butt,
    Square,
    Round,
}

/// Shape of the corner between two consecutive segments.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum LineJoin {
    #[default]
    Miter,
    MiterClip,
    Round,
    Bevel,
}

/// Line style.
///
/// `width` is in logical pixels: the tessellator turns it into per-vertex
/// extrusion vectors and the shader scales those by the map resolution, so the
/// on-screen width does not change with zoom.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
    pub cap: LineCap,
    pub join: LineJoin,
}

impl Stroke {
    #[inline]
    pub fn new(width: f32, color: Color) -> Self {
        Self {
            width,
            color,
            cap: LineCap::default(),
            join: LineJoin::default(),
        }
    }

    #[inline]
    pub fn with_cap(mut self, cap: LineCap) -> Self {
        self.cap = cap;
        self
    }

    #[inline]
    pub fn with_join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

impl Default for Stroke {
    fn default() -> Self {
        Self::new(1.0, Color::BLACK)
    }
}
