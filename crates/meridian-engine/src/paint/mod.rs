//! Paint model for line geometry.
//!
//! Scope:
//! - color representation (straight, unpremultiplied RGBA)
//! - stroke description consumed by the tessellator
//!
//! Geometry types remain in `coords`.

pub mod color;
pub mod stroke;

pub use color::Color;
pub use stroke::{LineCap, LineJoin, Stroke};
