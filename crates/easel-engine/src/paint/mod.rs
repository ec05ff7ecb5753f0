//! Color model shared between the scene and the renderers.
//!
//! Colors are stored premultiplied; geometry types live in `coords`.

pub mod color;

pub use color::Color;
