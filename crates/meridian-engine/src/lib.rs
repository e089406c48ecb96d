//! Meridian engine crate.
//!
//! Screen-space line rendering for 2D maps: a wgpu line pipeline whose vertex
//! stage extrudes centre-line vertices by a per-vertex normal scaled with the
//! current map resolution, plus the platform + GPU runtime that drives it.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod render;
pub mod scene;
pub mod tessellate;
pub mod view;
