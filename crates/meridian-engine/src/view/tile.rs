use glam::DVec2;

use super::{Lod, LodSet, MapBox};

/// Scheme bounds that land within this many pixels of a tile edge are
/// treated as lying on it.
const EDGE_TOLERANCE_PX: f64 = 0.1;

/// Direction in which tile rows are numbered.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum VerticalDirection {
    /// Row 0 touches the origin and rows grow downwards (web maps).
    TopToBottom,
    /// Row 0 touches the origin and rows grow upwards.
    BottomToTop,
}

/// Address of one tile in a [`TileGrid`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TileIndex {
    pub z: u32,
    pub x: i64,
    pub y: i64,
}

impl TileIndex {
    pub const fn new(z: u32, x: i64, y: i64) -> Self {
        Self { z, x, y }
    }
}

/// Regular tile grid over a [`LodSet`].
///
/// At level `z` every tile covers `tile_width x tile_height` pixels of that
/// level's resolution, counted from `origin`. Only tiles inside `bounds` exist.
#[derive(Debug, Clone, PartialEq)]
pub struct TileGrid {
    pub origin: DVec2,
    pub bounds: MapBox,
    pub lods: LodSet,
    pub tile_width: u32,
    pub tile_height: u32,
    pub y_direction: VerticalDirection,
}

impl TileGrid {
    /// Half the extent of the web-mercator plane, in metres.
    pub const WEB_HALF_EXTENT: f64 = 20037508.342787;

    /// Web-mercator grid: 256 px tiles, top-left origin, `count` levels.
    pub fn web(count: u32) -> Self {
        let e = Self::WEB_HALF_EXTENT;
        Self {
            origin: DVec2::new(-e, e),
            bounds: MapBox::from_coords(-e, -e, e, e),
            lods: LodSet::web(count),
            tile_width: 256,
            tile_height: 256,
            y_direction: VerticalDirection::TopToBottom,
        }
    }

    pub fn select_lod(&self, resolution: f64) -> Option<Lod> {
        self.lods.select(resolution)
    }

    /// Tiles of the level selected for `resolution` that overlap `area`,
    /// column by column.
    ///
    /// Edges are half-open: an area ending exactly on a tile boundary does not
    /// pull in the next tile. Returns `None` when no level fits `resolution`
    /// or `area` is not finite.
    pub fn iter_tiles(
        &self,
        resolution: f64,
        area: MapBox,
    ) -> Option<impl Iterator<Item = TileIndex> + use<>> {
        if !area.is_finite() {
            return None;
        }
        let lod = self.select_lod(resolution)?;
        let res = lod.resolution();
        let z = lod.z_index();

        let (x_min, x_max) = clamp_span(
            self.x_span(area, res, 0.0),
            self.x_span(self.bounds, res, EDGE_TOLERANCE_PX),
        );
        let (y_min, y_max) = clamp_span(
            self.y_span(area, res, 0.0),
            self.y_span(self.bounds, res, EDGE_TOLERANCE_PX),
        );

        Some((x_min..=x_max).flat_map(move |x| {
            (y_min..=y_max).map(move |y| TileIndex::new(z, x, y))
        }))
    }

    /// Map-space extent of `index`, or `None` for an unknown level.
    pub fn tile_bbox(&self, index: TileIndex) -> Option<MapBox> {
        let res = self.lods.resolution_of(index.z)?;
        let w = self.tile_width as f64 * res;
        let h = self.tile_height as f64 * res;

        let x_min = self.origin.x + index.x as f64 * w;
        let y_min = match self.y_direction {
            VerticalDirection::TopToBottom => self.origin.y - (index.y + 1) as f64 * h,
            VerticalDirection::BottomToTop => self.origin.y + index.y as f64 * h,
        };

        Some(MapBox::from_coords(x_min, y_min, x_min + w, y_min + h))
    }

    fn x_span(&self, b: MapBox, res: f64, slack: f64) -> (i64, i64) {
        let lo = (b.min.x - self.origin.x) / res;
        let hi = (b.max.x - self.origin.x) / res;
        index_span(lo, hi, self.tile_width as f64, slack)
    }

    fn y_span(&self, b: MapBox, res: f64, slack: f64) -> (i64, i64) {
        let (lo, hi) = match self.y_direction {
            VerticalDirection::TopToBottom => (self.origin.y - b.max.y, self.origin.y - b.min.y),
            VerticalDirection::BottomToTop => (b.min.y - self.origin.y, b.max.y - self.origin.y),
        };
        index_span(lo / res, hi / res, self.tile_height as f64, slack)
    }
}

/// First and last tile touched by the pixel interval `[lo, hi)`, measured
/// from the origin along the numbering direction.
fn index_span(lo: f64, hi: f64, tile_px: f64, slack: f64) -> (i64, i64) {
    let first = ((lo + slack) / tile_px).floor() as i64;
    if hi <= lo {
        return (first, first);
    }
    let last = ((hi - slack) / tile_px).ceil() as i64 - 1;
    (first, last)
}

fn clamp_span(wanted: (i64, i64), allowed: (i64, i64)) -> (i64, i64) {
    (wanted.0.max(allowed.0), wanted.1.min(allowed.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_grid() -> TileGrid {
        TileGrid {
            origin: DVec2::ZERO,
            bounds: MapBox::from_coords(0.0, 0.0, 2048.0, 2048.0),
            lods: LodSet::new(
                [
                    Lod::new(8.0, 0).unwrap(),
                    Lod::new(4.0, 1).unwrap(),
                    Lod::new(2.0, 2).unwrap(),
                ],
                2.0,
            ),
            tile_width: 256,
            tile_height: 256,
            y_direction: VerticalDirection::BottomToTop,
        }
    }

    fn tiles(grid: &TileGrid, res: f64, area: MapBox) -> Vec<TileIndex> {
        grid.iter_tiles(res, area).unwrap().collect()
    }

    fn all_within(tiles: &[TileIndex], z: u32, xs: (i64, i64), ys: (i64, i64)) -> bool {
        tiles.iter().all(|t| {
            t.z == z && (xs.0..=xs.1).contains(&t.x) && (ys.0..=ys.1).contains(&t.y)
        })
    }

    #[test]
    fn full_bounds_cover_every_tile_once() {
        let grid = simple_grid();
        let area = MapBox::from_coords(0.0, 0.0, 2048.0, 2048.0);

        assert_eq!(tiles(&grid, 8.0, area), vec![TileIndex::new(0, 0, 0)]);

        let t = tiles(&grid, 4.0, area);
        assert_eq!(t.len(), 4);
        assert!(all_within(&t, 1, (0, 1), (0, 1)));

        let t = tiles(&grid, 2.0, area);
        assert_eq!(t.len(), 16);
        assert!(all_within(&t, 2, (0, 3), (0, 3)));
    }

    #[test]
    fn partial_area_selects_overlapping_tiles() {
        let grid = simple_grid();
        let area = MapBox::from_coords(200.0, 700.0, 1200.0, 1100.0);

        assert_eq!(tiles(&grid, 8.0, area), vec![TileIndex::new(0, 0, 0)]);

        let t = tiles(&grid, 4.0, area);
        assert_eq!(t.len(), 4);
        assert!(all_within(&t, 1, (0, 1), (0, 1)));

        let t = tiles(&grid, 2.0, area);
        assert_eq!(t.len(), 6);
        assert!(all_within(&t, 2, (0, 2), (1, 2)));
    }

    #[test]
    fn area_outside_bounds_yields_nothing() {
        let grid = simple_grid();

        let below = MapBox::from_coords(-100.0, -100.0, -50.0, -50.0);
        assert_eq!(grid.iter_tiles(8.0, below).unwrap().count(), 0);
        assert_eq!(grid.iter_tiles(2.0, below).unwrap().count(), 0);

        let right = MapBox::from_coords(2100.0, 0.0, 2500.0, 2048.0);
        assert_eq!(grid.iter_tiles(8.0, right).unwrap().count(), 0);
        assert_eq!(grid.iter_tiles(2.0, right).unwrap().count(), 0);
    }

    #[test]
    fn oversized_area_is_clamped_to_bounds() {
        let grid = simple_grid();
        let area = MapBox::from_coords(-2048.0, -2048.0, 4096.0, 4096.0);
        assert_eq!(grid.iter_tiles(8.0, area).unwrap().count(), 1);
        assert_eq!(grid.iter_tiles(2.0, area).unwrap().count(), 16);
    }

    #[test]
    fn unusable_resolution_or_area_gives_none() {
        let grid = simple_grid();
        let area = MapBox::from_coords(0.0, 0.0, 10.0, 10.0);
        assert!(grid.iter_tiles(0.5, area).is_none());
        assert!(grid.iter_tiles(f64::NAN, area).is_none());

        let bad = MapBox::from_coords(0.0, 0.0, f64::INFINITY, 10.0);
        assert!(grid.iter_tiles(2.0, bad).is_none());
    }

    #[test]
    fn degenerate_area_selects_one_tile() {
        let grid = simple_grid();
        let point = MapBox::from_coords(600.0, 600.0, 600.0, 600.0);
        assert_eq!(tiles(&grid, 2.0, point), vec![TileIndex::new(2, 1, 1)]);
    }

    #[test]
    fn tile_bbox_follows_row_direction() {
        let mut grid = simple_grid();
        assert_eq!(
            grid.tile_bbox(TileIndex::new(2, 1, 2)),
            Some(MapBox::from_coords(512.0, 1024.0, 1024.0, 1536.0))
        );
        assert_eq!(grid.tile_bbox(TileIndex::new(7, 0, 0)), None);

        grid.origin = DVec2::new(0.0, 2048.0);
        grid.y_direction = VerticalDirection::TopToBottom;
        assert_eq!(
            grid.tile_bbox(TileIndex::new(2, 1, 2)),
            Some(MapBox::from_coords(512.0, 512.0, 1024.0, 1024.0))
        );

        let top_left = MapBox::from_coords(0.0, 1536.0, 512.0, 2048.0);
        assert_eq!(tiles(&grid, 2.0, top_left), vec![TileIndex::new(2, 0, 0)]);
    }

    #[test]
    fn enumerated_tiles_overlap_the_area() {
        let grid = simple_grid();
        let area = MapBox::from_coords(200.0, 700.0, 1200.0, 1100.0);
        for t in tiles(&grid, 2.0, area) {
            let b = grid.tile_bbox(t).unwrap();
            assert!(b.min.x < area.max.x && b.max.x > area.min.x, "{t:?}");
            assert!(b.min.y < area.max.y && b.max.y > area.min.y, "{t:?}");
        }
    }

    #[test]
    fn web_grid_levels() {
        let grid = TileGrid::web(20);
        let world = grid.bounds;

        let top = LodSet::WEB_TOP_RESOLUTION;
        assert_eq!(tiles(&grid, top, world), vec![TileIndex::new(0, 0, 0)]);
        assert_eq!(grid.iter_tiles(top / 2.0, world).unwrap().count(), 4);

        // Row 0 of level 1 is the northern half.
        let nw = grid.tile_bbox(TileIndex::new(1, 0, 0)).unwrap();
        let e = TileGrid::WEB_HALF_EXTENT;
        assert!((nw.min.x + e).abs() < 1e-6 && nw.max.x.abs() < 1e-6);
        assert!(nw.min.y.abs() < 1e-6 && (nw.max.y - e).abs() < 1e-6);
    }
}
