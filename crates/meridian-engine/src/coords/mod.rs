//! Coordinate and geometry types shared across the view, scene and renderers.
//!
//! Two spaces are in play:
//! - screen space: logical pixels, origin top-left, +X right, +Y down
//! - map space: map units, +X east, +Y north (up)
//!
//! `view::MapView` converts between them and produces the projection used by
//! the line shader.

mod rect;
mod vec2;
mod viewport;

pub use rect::Rect;
pub use vec2::Vec2;
pub use viewport::Viewport;
