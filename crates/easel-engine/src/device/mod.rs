//! GPU device and window surface.
//!
//! One [`Gpu`] per window: adapter/device selection, surface format and
//! alpha-mode choice, resize handling, and per-redraw frame acquisition.

mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
