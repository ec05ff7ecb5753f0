//! easel engine crate.
//!
//! Owns the platform + GPU pieces used by the `easel` drawing library:
//! the winit runtime, input translation, the primitive scene model and
//! the wgpu renderers that consume it.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
pub mod paint;
pub mod scene;
pub mod text;
