use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{Primitive, SceneBuffer};

/// Text draw payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
}

impl SceneBuffer {
    /// Records a text draw command using the renderer's default font.
    pub fn push_text(&mut self, origin: Vec2, size: f32, text: impl Into<String>, color: Color) {
        self.push(Primitive::Text(TextCmd {
            text: text.into(),
            size,
            color,
            origin,
        }));
    }
}
