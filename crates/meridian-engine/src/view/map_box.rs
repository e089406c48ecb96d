use glam::DVec2;

use crate::coords::{Rect, Vec2};

/// Axis-aligned box in map units, kept in `f64`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapBox {
    pub min: DVec2,
    pub max: DVec2,
}

impl MapBox {
    /// Box spanned by two opposite corners, in any order.
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    pub fn from_coords(x_min: f64, y_min: f64, x_max: f64, y_max: f64) -> Self {
        Self::new(DVec2::new(x_min, y_min), DVec2::new(x_max, y_max))
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Narrows to an `f32` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            self.min.x as f32,
            self.min.y as f32,
            self.width() as f32,
            self.height() as f32,
        )
    }

    /// Corners counter-clockwise from `min`, narrowed to `f32`.
    pub fn corners(&self) -> [Vec2; 4] {
        let (a, b) = (self.min.as_vec2(), self.max.as_vec2());
        [
            Vec2::new(a.x, a.y),
            Vec2::new(b.x, a.y),
            Vec2::new(b.x, b.y),
            Vec2::new(a.x, b.y),
        ]
    }
}

impl From<Rect> for MapBox {
    fn from(r: Rect) -> Self {
        let r = r.normalized();
        let max = r.max();
        Self::from_coords(r.origin.x as f64, r.origin.y as f64, max.x as f64, max.y as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_are_ordered_regardless_of_input() {
        let b = MapBox::from_coords(4.0, 3.0, -2.0, -1.0);
        assert_eq!(b.min, DVec2::new(-2.0, -1.0));
        assert_eq!(b.max, DVec2::new(4.0, 3.0));
        assert_eq!((b.width(), b.height()), (6.0, 4.0));
        assert_eq!(b.corners()[2], Vec2::new(4.0, 3.0));
    }

    #[test]
    fn rect_conversion() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let b = MapBox::from(r);
        assert_eq!(b, MapBox::from_coords(1.0, 2.0, 4.0, 6.0));
        assert_eq!(b.to_rect(), r);
    }
}
