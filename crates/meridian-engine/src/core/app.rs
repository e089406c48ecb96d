use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::FrameCtx;

/// Returned by app callbacks to keep the loop running or stop it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

impl AppControl {
    #[inline]
    pub fn exit_if(exit: bool) -> Self {
        if exit { AppControl::Exit } else { AppControl::Continue }
    }
}

/// Implemented by the application driven by `window::Runtime`.
pub trait App {
    /// Raw window events, after the runtime has folded them into input state.
    ///
    /// Most applications only need `on_frame` and the input it carries.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Once per redraw of each window.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_if() {
        assert_eq!(AppControl::exit_if(true), AppControl::Exit);
        assert_eq!(AppControl::exit_if(false), AppControl::Continue);
    }
}
