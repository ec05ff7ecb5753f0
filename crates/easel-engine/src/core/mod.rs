//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the layer above it. It keeps runtime internals out of user code and gives
//! every frame the same context shape.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, WindowCtx};
