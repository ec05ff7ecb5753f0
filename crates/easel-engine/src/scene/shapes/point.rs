use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{Primitive, SceneBuffer};

/// Single pixel payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PointCmd {
    pub at: Vec2,
    pub color: Color,
}

/// Batch of pixels sharing one color.
#[derive(Debug, Clone, PartialEq)]
pub struct PointsCmd {
    pub points: Vec<Vec2>,
    pub color: Color,
}

impl SceneBuffer {
    #[inline]
    pub fn push_point(&mut self, at: Vec2, color: Color) {
        self.push(Primitive::Point(PointCmd { at, color }));
    }

    #[inline]
    pub fn push_points(&mut self, points: Vec<Vec2>, color: Color) {
        self.push(Primitive::Points(PointsCmd { points, color }));
    }
}
