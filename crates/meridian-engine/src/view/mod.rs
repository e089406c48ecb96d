//! Map view state.
//!
//! A [`MapView`] is a centre point in map units, a resolution (map units per
//! logical pixel) and a viewport size. It produces the `view_proj` matrix and
//! the `resolution` scalar consumed by the line shader, and converts between
//! screen and map coordinates for navigation.
//!
//! [`LodSet`] snaps resolutions to the discrete levels of a map pyramid, and
//! [`TileGrid`] enumerates the tiles of the selected level that cover a
//! visible [`MapBox`].

mod lod;
mod map_box;
mod map_view;
mod tile;

pub use lod::{Lod, LodSet};
pub use map_box::MapBox;
pub use map_view::MapView;
pub use tile::{TileGrid, TileIndex, VerticalDirection};
