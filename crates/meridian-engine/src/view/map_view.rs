use glam::{DMat4, DVec2, DVec3, Mat4};

use crate::coords::{Rect, Vec2, Viewport};

use super::MapBox;

/// Orthographic view over a planar map.
///
/// Map space has +Y pointing up; screen space has +Y pointing down with the
/// origin in the top-left corner. The view centre projects to the middle of
/// the viewport and to the clip-space origin.
///
/// Setters ignore invalid input (non-finite values, non-positive resolution)
/// and keep the previous state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MapView {
    center: DVec2,
    resolution: f64,
    size: Viewport,
}

impl MapView {
    pub fn new(center: DVec2, resolution: f64, size: Viewport) -> Self {
        Self {
            center,
            resolution,
            size,
        }
    }

    #[inline]
    pub fn center(&self) -> DVec2 {
        self.center
    }

    /// Map units per logical pixel.
    #[inline]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    #[inline]
    pub fn size(&self) -> Viewport {
        self.size
    }

    pub fn is_valid(&self) -> bool {
        self.center.is_finite()
            && self.resolution.is_finite()
            && self.resolution > 0.0
            && self.size.is_valid()
    }

    pub fn with_center(mut self, center: DVec2) -> Self {
        self.set_center(center);
        self
    }

    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.set_resolution(resolution);
        self
    }

    pub fn with_size(mut self, size: Viewport) -> Self {
        self.set_size(size);
        self
    }

    /// Returns `false` (and leaves the view untouched) for a non-finite centre.
    pub fn set_center(&mut self, center: DVec2) -> bool {
        if !center.is_finite() {
            return false;
        }
        self.center = center;
        true
    }

    /// Returns `false` (and leaves the view untouched) for an unusable resolution.
    pub fn set_resolution(&mut self, resolution: f64) -> bool {
        if !resolution.is_finite() || resolution <= 0.0 {
            return false;
        }
        self.resolution = resolution;
        true
    }

    /// Returns `false` (and leaves the view untouched) for a degenerate viewport.
    ///
    /// Minimized windows report a zero size; keeping the last good size avoids
    /// a singular projection.
    pub fn set_size(&mut self, size: Viewport) -> bool {
        if !size.is_valid() {
            return false;
        }
        self.size = size;
        true
    }

    /// Map-to-clip transform (column-major, `matrix * column_vector`).
    ///
    /// Computed in `f64` and narrowed once at the end.
    pub fn view_proj(&self) -> Mat4 {
        let w = self.size.width as f64 * self.resolution;
        let h = self.size.height as f64 * self.resolution;

        let scale = DMat4::from_scale(DVec3::new(2.0 / w, 2.0 / h, 1.0));
        let translate = DMat4::from_translation(DVec3::new(-self.center.x, -self.center.y, 0.0));

        (scale * translate).as_mat4()
    }

    fn half_size(&self) -> DVec2 {
        DVec2::new(self.size.width as f64, self.size.height as f64) * 0.5
    }

    /// Projects a map point to logical screen pixels.
    pub fn map_to_screen(&self, p: DVec2) -> Vec2 {
        let half = self.half_size();
        let x = (p.x - self.center.x) / self.resolution + half.x;
        let y = half.y - (p.y - self.center.y) / self.resolution;
        Vec2::new(x as f32, y as f32)
    }

    /// Unprojects logical screen pixels to a map point.
    pub fn screen_to_map(&self, s: Vec2) -> DVec2 {
        let half = self.half_size();
        DVec2::new(
            self.center.x + (s.x as f64 - half.x) * self.resolution,
            self.center.y - (s.y as f64 - half.y) * self.resolution,
        )
    }

    /// Moves the map together with a pointer drag of `(dx, dy)` logical pixels.
    ///
    /// Returns `false` (view untouched) if the shifted centre is not finite.
    pub fn translate_by_pixels(&mut self, delta: Vec2) -> bool {
        let shifted = DVec2::new(
            self.center.x - delta.x as f64 * self.resolution,
            self.center.y + delta.y as f64 * self.resolution,
        );
        self.set_center(shifted)
    }

    /// Sets `resolution` while keeping the map point under `anchor` (screen
    /// pixels) in place.
    ///
    /// Both the resolution and the resulting centre are checked before either
    /// is stored; on failure the view is untouched.
    pub fn zoom_to(&mut self, resolution: f64, anchor: Vec2) -> bool {
        if !resolution.is_finite() || resolution <= 0.0 {
            return false;
        }

        let fixed = self.screen_to_map(anchor);
        let half = self.half_size();
        let center = DVec2::new(
            fixed.x - (anchor.x as f64 - half.x) * resolution,
            fixed.y + (anchor.y as f64 - half.y) * resolution,
        );
        if !center.is_finite() {
            return false;
        }

        self.resolution = resolution;
        self.center = center;
        true
    }

    /// Multiplies the resolution by `factor` around `anchor`.
    ///
    /// `factor < 1` zooms in, `factor > 1` zooms out.
    pub fn zoom_at(&mut self, factor: f64, anchor: Vec2) -> bool {
        self.zoom_to(self.resolution * factor, anchor)
    }

    /// Centres the view on `bounds` (map units) and picks the resolution that
    /// fits it inside the viewport minus `padding` logical pixels on each side.
    ///
    /// A zero-area box only recentres. Returns `false` (view untouched) when
    /// `bounds` is not finite or the fitted resolution is unusable.
    pub fn fit_bounds(&mut self, bounds: Rect, padding: f32) -> bool {
        if !bounds.is_finite() {
            return false;
        }
        let bounds = bounds.normalized();
        let c = bounds.center();
        let center = DVec2::new(c.x as f64, c.y as f64);

        let avail_w = (self.size.width - 2.0 * padding).max(1.0) as f64;
        let avail_h = (self.size.height - 2.0 * padding).max(1.0) as f64;
        let res = (bounds.size.x as f64 / avail_w).max(bounds.size.y as f64 / avail_h);

        let resolution = if res == 0.0 { self.resolution } else { res };
        if !center.is_finite() || !resolution.is_finite() || resolution <= 0.0 {
            return false;
        }

        self.center = center;
        self.resolution = resolution;
        true
    }

    /// Visible map area in `f64`.
    pub fn map_box(&self) -> MapBox {
        let half = self.half_size() * self.resolution;
        MapBox::new(self.center - half, self.center + half)
    }

    /// Visible map area, narrowed to `f32`.
    pub fn bounding_box(&self) -> Rect {
        self.map_box().to_rect()
    }
}

impl Default for MapView {
    fn default() -> Self {
        Self::new(DVec2::ZERO, 1.0, Viewport::new(1.0, 1.0))
    }
}
