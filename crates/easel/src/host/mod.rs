//! Loops that consume frames and produce input.
//!
//! A host runs on the thread that called [`crate::run_with`] while the
//! drawing callback runs on its own thread. Hosts only talk to the callback
//! through the [`FrameCoordinator`].

use std::sync::Arc;

use crate::coordinator::{Frame, FrameCoordinator};

mod headless;
mod window;

pub use headless::HeadlessHost;
pub use window::WindowHost;

/// Runs the render/input loop against a coordinator until the window closes.
///
/// Implementations call [`FrameCoordinator::wait_frame`] to take frames and
/// [`FrameCoordinator::request_close`] when their surface goes away. They
/// must return once the coordinator leaves `Running`.
pub trait Host {
    fn run(self, coord: Arc<FrameCoordinator>) -> anyhow::Result<()>;
}

/// Receives every frame a [`HeadlessHost`] takes.
pub trait FrameSink {
    fn consume(&mut self, frame: &Frame) -> anyhow::Result<()>;
}

impl<F> FrameSink for F
where
    F: FnMut(&Frame) -> anyhow::Result<()>,
{
    fn consume(&mut self, frame: &Frame) -> anyhow::Result<()> {
        self(frame)
    }
}
