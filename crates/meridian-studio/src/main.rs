mod demo;

use anyhow::Result;

use meridian_engine::coords::{Rect, Vec2, Viewport};
use meridian_engine::core::{App, AppControl, FrameCtx};
use meridian_engine::device::GpuInit;
use meridian_engine::input::{Key, MouseButton};
use meridian_engine::logging::{init_logging, LoggingConfig};
use meridian_engine::paint::Color;
use meridian_engine::render::line::LineRenderer;
use meridian_engine::scene::DrawList;
use meridian_engine::view::{MapView, TileGrid};
use meridian_engine::window::{CursorIcon, Runtime, RuntimeConfig};

const HOME_PADDING: f32 = 40.0;
const ARROW_PAN_PX: f32 = 60.0;
const LOD_LEVELS: u32 = 24;

struct Studio {
    view: MapView,
    grid: TileGrid,
    home: Rect,
    homed: bool,
    draw_list: DrawList,
    lines: LineRenderer,
    show_tiles: bool,
    tile_list: DrawList,
    tile_lines: LineRenderer,
    background: Color,
}

impl Studio {
    fn new() -> Self {
        let scene = demo::build();
        Self {
            view: MapView::default(),
            grid: TileGrid::web(LOD_LEVELS),
            home: scene.bounds,
            homed: false,
            draw_list: scene.draw_list,
            lines: LineRenderer::new(),
            show_tiles: false,
            tile_list: DrawList::new(),
            tile_lines: LineRenderer::new(),
            background: Color::from_hex("#1b1f27").unwrap_or(Color::BLACK),
        }
    }

    /// Fits the scene, then backs out to the nearest pyramid level that still
    /// shows all of it.
    fn go_home(&mut self) {
        self.view.fit_bounds(self.home, HOME_PADDING);
        let fit = self.view.resolution();

        let snapped = self.grid.lods.select(fit).and_then(|lod| {
            if lod.resolution() < fit {
                self.grid.lods.coarser(fit)
            } else {
                Some(lod)
            }
        });
        if let Some(lod) = snapped {
            self.view.set_resolution(lod.resolution());
        }
        log::info!("home view: resolution {:.4}", self.view.resolution());
    }

    /// Steps one pyramid level in or out, keeping `anchor` fixed.
    fn zoom_step(&mut self, zoom_in: bool, anchor: Vec2) {
        let res = self.view.resolution();
        let target = if zoom_in {
            self.grid.lods.finer(res)
        } else {
            self.grid.lods.coarser(res)
        };

        let changed = match target {
            Some(lod) => {
                log::debug!("zoom to z{} ({:.4})", lod.z_index(), lod.resolution());
                self.view.zoom_to(lod.resolution(), anchor)
            }
            // Off the pyramid: plain factor-of-two steps.
            None => self.view.zoom_at(if zoom_in { 0.5 } else { 2.0 }, anchor),
        };
        if !changed {
            log::debug!("zoom ignored at resolution {res}");
        }
    }

    fn navigate(&mut self, ctx: &FrameCtx<'_, '_>) {
        let input = ctx.input;
        let frame = ctx.input_frame;
        let size = self.view.size();
        let center = Vec2::new(size.width * 0.5, size.height * 0.5);

        if frame.key_pressed(Key::Digit0) {
            self.go_home();
        }
        if frame.key_pressed(Key::Space) {
            self.show_tiles = !self.show_tiles;
            log::info!("tile outlines {}", if self.show_tiles { "on" } else { "off" });
        }

        let drag = frame.drag_delta;
        if drag != Vec2::zero() {
            self.view.translate_by_pixels(drag);
        }

        let arrows = [
            (Key::ArrowLeft, Vec2::new(ARROW_PAN_PX, 0.0)),
            (Key::ArrowRight, Vec2::new(-ARROW_PAN_PX, 0.0)),
            (Key::ArrowUp, Vec2::new(0.0, ARROW_PAN_PX)),
            (Key::ArrowDown, Vec2::new(0.0, -ARROW_PAN_PX)),
        ];
        for (key, delta) in arrows {
            if frame.key_pressed(key) {
                self.view.translate_by_pixels(delta);
            }
        }

        let anchor = input.pointer_pos.unwrap_or(center);
        if frame.wheel_lines > 0.0 {
            self.zoom_step(true, anchor);
        } else if frame.wheel_lines < 0.0 {
            self.zoom_step(false, anchor);
        }

        if frame.key_pressed(Key::ZoomIn) {
            self.zoom_step(true, center);
        }
        if frame.key_pressed(Key::ZoomOut) {
            self.zoom_step(false, center);
        }

        ctx.window.set_cursor(if input.button_down(MouseButton::Left) {
            CursorIcon::Grabbing
        } else {
            CursorIcon::Grab
        });
    }
}

impl App for Studio {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let size: Viewport = ctx.window.logical_size();
        self.view.set_size(size);
        if !self.homed && self.view.size() == size {
            self.go_home();
            self.homed = true;
        }

        self.navigate(ctx);

        if self.show_tiles {
            demo::tile_outlines(&self.grid, &self.view, &mut self.tile_list);
        } else {
            self.tile_list.clear();
        }

        let view = self.view;
        let (lines, draw_list) = (&mut self.lines, &mut self.draw_list);
        let (tile_lines, tile_list) = (&mut self.tile_lines, &mut self.tile_list);
        ctx.render(&view, self.background, |rctx, target| {
            lines.render(rctx, target, draw_list);
            tile_lines.render(rctx, target, tile_list);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "meridian studio".to_string(),
        ..RuntimeConfig::default()
    };

    log::info!("drag to pan, wheel or +/- to zoom, 0 to reset, Space for tiles, Esc to quit");
    Runtime::run(config, GpuInit::default(), Studio::new())
}
