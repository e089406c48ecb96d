//! Window + event loop.
//!
//! Owns the winit `EventLoop` and windows, and binds each window to its own
//! `Gpu`, input state and frame clock.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
pub use winit::window::CursorIcon;
