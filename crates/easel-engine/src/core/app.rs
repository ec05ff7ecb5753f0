use winit::event::WindowEvent;

use crate::input::InputEvent;

use super::ctx::FrameCtx;

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Callbacks run on the event-loop thread, in this order for a frame:
/// input and window events as they arrive, then `on_frame` on redraw.
pub trait App {
    /// Called for every translated input event, as soon as it arrives.
    fn on_input(&mut self, event: &InputEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called for raw window events, after input translation.
    ///
    /// `CloseRequested` is delivered here before the runtime exits.
    fn on_window_event(&mut self, event: &WindowEvent) -> AppControl {
        let _ = event;
        AppControl::Continue
    }

    /// Called once per redraw.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;
}
