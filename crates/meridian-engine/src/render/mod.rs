//! GPU rendering subsystem.
//!
//! Renderers consume `scene` draw lists and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers).
//!
//! Convention:
//! - geometry positions are in map units (+Y up)
//! - line extrusion (`norm`) is in logical pixels
//! - the vertex shader projects with the `MapView` view-projection matrix

mod ctx;
pub mod line;

pub use ctx::{RenderCtx, RenderTarget};
