//! Contract between the runtime and applications.
//!
//! The runtime owns windows, GPU state, input and timing; applications see
//! them only through the callbacks of [`App`] and the per-frame [`FrameCtx`].

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
