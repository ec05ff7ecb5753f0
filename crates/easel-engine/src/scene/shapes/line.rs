use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{Primitive, SceneBuffer};

/// Line segment payload.
#[derive(Debug, Clone, PartialEq)]
pub struct LineCmd {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
}

impl SceneBuffer {
    /// Records a one-pixel line segment.
    #[inline]
    pub fn push_line(&mut self, from: Vec2, to: Vec2, color: Color) {
        self.push(Primitive::Line(LineCmd { from, to, color }));
    }
}
