use super::Vec2;

/// Axis-aligned rectangle given by origin and size.
///
/// In screen space the origin is the top-left corner. In map space it is the
/// corner with the smallest coordinates (south-west).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Rect {
    pub origin: Vec2,
    pub size: Vec2,
}

impl Rect {
    #[inline]
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            origin: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y).normalized()
    }

    /// Smallest rectangle containing all finite `points`.
    ///
    /// Returns `None` when there is no finite point.
    pub fn from_points<I>(points: I) -> Option<Rect>
    where
        I: IntoIterator<Item = Vec2>,
    {
        let mut iter = points.into_iter().filter(|p| p.is_finite());
        let first = iter.next()?;

        let (min, max) = iter.fold((first, first), |(min, max), p| {
            (
                Vec2::new(min.x.min(p.x), min.y.min(p.y)),
                Vec2::new(max.x.max(p.x), max.y.max(p.y)),
            )
        });

        Some(Rect::from_min_max(min, max))
    }

    #[inline]
    pub fn min(self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn max(self) -> Vec2 {
        Vec2::new(self.origin.x + self.size.x, self.origin.y + self.size.y)
    }

    #[inline]
    pub fn center(self) -> Vec2 {
        Vec2::new(
            self.origin.x + self.size.x * 0.5,
            self.origin.y + self.size.y * 0.5,
        )
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.origin.is_finite() && self.size.is_finite()
    }

    /// Normalizes the rectangle so width/height are non-negative.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut x = self.origin.x;
        let mut y = self.origin.y;
        let mut w = self.size.x;
        let mut h = self.size.y;

        if w < 0.0 {
            x += w;
            w = -w;
        }
        if h < 0.0 {
            y += h;
            h = -h;
        }

        Rect::new(x, y, w, h)
    }

    /// Half-open containment: [min, max).
    #[inline]
    pub fn contains(self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.origin.x
            && p.y >= r.origin.y
            && p.x < (r.origin.x + r.size.x)
            && p.y < (r.origin.y + r.size.y)
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[inline]
    pub fn union(self, other: Rect) -> Rect {
        let a = self.normalized();
        let b = other.normalized();

        let min = Vec2::new(a.origin.x.min(b.origin.x), a.origin.y.min(b.origin.y));
        let max = Vec2::new(a.max().x.max(b.max().x), a.max().y.max(b.max().y));
        Rect::from_min_max(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(x: f32, y: f32, w: f32, h: f32) -> Rect { Rect::new(x, y, w, h) }

    // ── normalized ────────────────────────────────────────────────────────

    #[test]
    fn normalized_positive_is_identity() {
        let rect = r(1.0, 2.0, 10.0, 20.0);
        assert_eq!(rect.normalized(), rect);
    }

    #[test]
    fn normalized_negative_width() {
        let n = r(10.0, 0.0, -4.0, 5.0).normalized();
        assert_eq!(n.origin.x, 6.0);
        assert_eq!(n.size.x, 4.0);
    }

    // ── from_points ───────────────────────────────────────────────────────

    #[test]
    fn from_points_spans_all_points() {
        let b = Rect::from_points([
            Vec2::new(3.0, -1.0),
            Vec2::new(-2.0, 4.0),
            Vec2::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(b, r(-2.0, -1.0, 5.0, 5.0));
    }

    #[test]
    fn from_points_skips_non_finite() {
        let b = Rect::from_points([
            Vec2::new(f32::NAN, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(2.0, 3.0),
        ])
        .unwrap();
        assert_eq!(b, r(1.0, 1.0, 1.0, 2.0));
    }

    #[test]
    fn from_points_empty_is_none() {
        assert!(Rect::from_points(std::iter::empty()).is_none());
        assert!(Rect::from_points([Vec2::new(f32::INFINITY, 0.0)]).is_none());
    }

    #[test]
    fn single_point_is_empty_rect() {
        let b = Rect::from_points([Vec2::new(5.0, 5.0)]).unwrap();
        assert!(b.is_empty());
        assert_eq!(b.center(), Vec2::new(5.0, 5.0));
    }

    // ── contains / union ──────────────────────────────────────────────────

    #[test]
    fn contains_bottom_right_exclusive() {
        assert!(r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(0.0, 0.0)));
        assert!(!r(0.0, 0.0, 10.0, 10.0).contains(Vec2::new(10.0, 10.0)));
    }

    #[test]
    fn union_covers_both() {
        let u = r(0.0, 0.0, 2.0, 2.0).union(r(5.0, -1.0, 1.0, 1.0));
        assert_eq!(u, r(0.0, -1.0, 6.0, 3.0));
        assert_eq!(u.center(), Vec2::new(3.0, 0.5));
    }
}
