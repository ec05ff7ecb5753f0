use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{Primitive, SceneBuffer};

/// Axis-aligned ellipse payload.
///
/// `origin` is the top-left corner of the bounding box, `size` its extent.
#[derive(Debug, Clone, PartialEq)]
pub struct EllipseCmd {
    pub origin: Vec2,
    pub size: Vec2,
    pub stroke: Color,
    pub fill: Color,
}

impl EllipseCmd {
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.origin + self.size * 0.5
    }

    #[inline]
    pub fn radii(&self) -> Vec2 {
        Vec2::new(self.size.x.abs() * 0.5, self.size.y.abs() * 0.5)
    }
}

impl SceneBuffer {
    /// Records an ellipse inscribed in the given bounding box.
    #[inline]
    pub fn push_ellipse(&mut self, origin: Vec2, size: Vec2, stroke: Color, fill: Color) {
        self.push(Primitive::Ellipse(EllipseCmd { origin, size, stroke, fill }));
    }
}
