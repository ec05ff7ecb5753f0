//! Time subsystem.
//!
//! Frame timing utilities that do not depend on the runtime:
//! - `FrameClock`: one per render loop; `tick()` once per presented frame
//! - `FramePacer`: computes when the drawing thread may start its next frame

mod frame_clock;
mod pacer;

pub use frame_clock::{FrameClock, FrameTime};
pub use pacer::FramePacer;
