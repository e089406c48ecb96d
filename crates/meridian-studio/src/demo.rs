//! Demo scene in map units.

use std::f32::consts::{PI, TAU};

use meridian_engine::coords::{Rect, Vec2};
use meridian_engine::paint::{Color, LineCap, LineJoin, Stroke};
use meridian_engine::scene::{DrawCmd, DrawList, ZIndex};
use meridian_engine::tessellate::LineTessellator;
use meridian_engine::view::{MapView, TileGrid};

const GRID_EXTENT: f32 = 2000.0;
const GRID_STEP: f32 = 250.0;

/// Upper bound on outlined tiles per frame.
const MAX_TILE_OUTLINES: usize = 512;

pub struct DemoScene {
    pub draw_list: DrawList,
    pub bounds: Rect,
}

pub fn build() -> DemoScene {
    let mut list = DrawList::new();

    push_grid(&mut list);

    list.push_polyline(
        ZIndex::DEFAULT,
        spiral(Vec2::new(-900.0, -700.0), 40.0, 6.0),
        Stroke::new(3.0, Color::from_rgba_u8(0xE0, 0x7A, 0x1F, 0xFF))
            .with_cap(LineCap::Round)
            .with_join(LineJoin::Round),
    );

    list.push_polygon_outline(
        ZIndex::OVERLAY,
        star(Vec2::new(900.0, 600.0), 700.0, 280.0, 5),
        Stroke::new(6.0, Color::from_rgba_u8(0x2B, 0x6C, 0xD6, 0xFF).with_alpha(0.8))
            .with_join(LineJoin::Miter),
    );

    // Static geometry can be stroked once and replayed as a mesh.
    let route = route();
    match LineTessellator::new().tessellate(&route, false, &route_stroke()) {
        Ok(mesh) => list.push_mesh(ZIndex::OVERLAY, mesh),
        Err(e) => log::warn!("route not tessellated: {e}"),
    }

    let bounds = bounds_of(&list).unwrap_or(Rect::new(-1.0, -1.0, 2.0, 2.0));
    log::debug!("demo scene: {} commands, bounds {bounds:?}", list.len());

    DemoScene {
        draw_list: list,
        bounds,
    }
}

/// Replaces `list` with the outlines of the `grid` tiles visible in `view`.
///
/// Returns how many tiles were outlined.
pub fn tile_outlines(grid: &TileGrid, view: &MapView, list: &mut DrawList) -> usize {
    list.clear();
    let Some(tiles) = grid.iter_tiles(view.resolution(), view.map_box()) else {
        return 0;
    };

    let stroke = Stroke::new(1.5, Color::from_rgba_u8(0xF2, 0xC9, 0x4C, 0xFF).with_alpha(0.6))
        .with_join(LineJoin::Miter);
    let mut count = 0;
    for index in tiles.take(MAX_TILE_OUTLINES) {
        if let Some(bbox) = grid.tile_bbox(index) {
            list.push_polygon_outline(ZIndex::OVERLAY, bbox.corners().to_vec(), stroke);
            count += 1;
        }
    }
    count
}

fn push_grid(list: &mut DrawList) {
    let minor = Stroke::new(1.0, Color::from_hex("#3a4250").unwrap_or(Color::BLACK));
    let axis = Stroke::new(2.0, Color::from_hex("#6b7688").unwrap_or(Color::WHITE));

    let steps = (2.0 * GRID_EXTENT / GRID_STEP) as i32;
    for i in 0..=steps {
        let t = -GRID_EXTENT + i as f32 * GRID_STEP;
        let stroke = if t == 0.0 { axis } else { minor };
        list.push_polyline(
            ZIndex::BACKGROUND,
            vec![Vec2::new(t, -GRID_EXTENT), Vec2::new(t, GRID_EXTENT)],
            stroke,
        );
        list.push_polyline(
            ZIndex::BACKGROUND,
            vec![Vec2::new(-GRID_EXTENT, t), Vec2::new(GRID_EXTENT, t)],
            stroke,
        );
    }
}

/// Archimedean spiral with `turns` revolutions, `spacing` map units apart.
fn spiral(center: Vec2, spacing: f32, turns: f32) -> Vec<Vec2> {
    let steps = (turns * 64.0) as usize;
    (0..=steps)
        .map(|i| {
            let theta = i as f32 / 64.0 * TAU;
            let r = spacing * theta / TAU;
            center + Vec2::new(r * theta.cos(), r * theta.sin())
        })
        .collect()
}

fn star(center: Vec2, outer: f32, inner: f32, points: usize) -> Vec<Vec2> {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = PI / 2.0 + i as f32 * PI / points as f32;
            center + Vec2::new(r * a.cos(), r * a.sin())
        })
        .collect()
}

fn route() -> Vec<Vec2> {
    [
        (-1800.0, 1500.0),
        (-1200.0, 1100.0),
        (-600.0, 1300.0),
        (0.0, 700.0),
        (300.0, 750.0),
        (600.0, -200.0),
        (1500.0, -900.0),
    ]
    .into_iter()
    .map(|(x, y)| Vec2::new(x, y))
    .collect()
}

fn route_stroke() -> Stroke {
    Stroke::new(5.0, Color::from_rgba_u8(0x3C, 0xB3, 0x71, 0xFF))
        .with_cap(LineCap::Square)
        .with_join(LineJoin::Bevel)
}

fn bounds_of(list: &DrawList) -> Option<Rect> {
    let points = list.items().iter().flat_map(|item| -> Vec<Vec2> {
        match &item.cmd {
            DrawCmd::Polyline(cmd) => cmd.points.clone(),
            DrawCmd::Mesh(cmd) => cmd
                .mesh
                .vertices
                .iter()
                .map(|v| Vec2::from(v.position))
                .collect(),
        }
    });
    Rect::from_points(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_engine::coords::Viewport;
    use meridian_engine::view::LodSet;

    #[test]
    fn star_alternates_radii() {
        let pts = star(Vec2::zero(), 10.0, 4.0, 5);
        assert_eq!(pts.len(), 10);
        assert!((pts[0].length() - 10.0).abs() < 1e-4);
        assert!((pts[1].length() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn scene_bounds_cover_grid() {
        let scene = build();
        assert!(!scene.draw_list.is_empty());
        assert!(scene.bounds.min().x <= -GRID_EXTENT);
        assert!(scene.bounds.max().y >= GRID_EXTENT);
    }

    #[test]
    fn tile_outlines_cover_the_view() {
        let grid = TileGrid::web(20);
        let res = LodSet::WEB_TOP_RESOLUTION / 4.0;
        // 512 px at level 2 is two tiles wide; shifted by half a tile the
        // view straddles three columns and three rows.
        let mut view = MapView::default()
            .with_size(Viewport::new(512.0, 512.0))
            .with_resolution(res);
        assert!(view.translate_by_pixels(Vec2::new(-128.0, -128.0)));

        let mut list = DrawList::new();
        assert_eq!(tile_outlines(&grid, &view, &mut list), 9);
        assert_eq!(list.len(), 9);

        // Rebuilding replaces the previous outlines.
        let far = view.with_resolution(1e-9);
        assert_eq!(tile_outlines(&grid, &far, &mut list), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn route_is_recorded_as_mesh() {
        let scene = build();
        assert!(
            scene
                .draw_list
                .items()
                .iter()
                .any(|item| matches!(item.cmd, DrawCmd::Mesh(_)))
        );
    }
}
