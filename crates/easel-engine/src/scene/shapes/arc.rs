use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{Primitive, SceneBuffer};

/// How the ends of an elliptical arc are closed.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ArcKind {
    /// Open curve; only stroked.
    Arc,
    /// Ends joined by a straight segment.
    Chord,
    /// Ends joined through the center (a wedge).
    Pie,
}

impl ArcKind {
    pub fn name(self) -> &'static str {
        match self {
            ArcKind::Arc => "arc",
            ArcKind::Chord => "chord",
            ArcKind::Pie => "pie",
        }
    }
}

/// Elliptical arc payload.
///
/// Angles are radians, counter-clockwise on screen from the +X axis.
/// `sweep` may be negative (clockwise).
#[derive(Debug, Clone, PartialEq)]
pub struct ArcCmd {
    pub origin: Vec2,
    pub size: Vec2,
    pub start: f32,
    pub sweep: f32,
    pub kind: ArcKind,
    pub stroke: Color,
    /// Ignored for `ArcKind::Arc`.
    pub fill: Color,
}

impl ArcCmd {
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
    /// Records an arc, chord or pie segment of the ellipse inscribed in the box.
    #[inline]
    pub fn push_arc(
        &mut self,
        kind: ArcKind,
        origin: Vec2,
        size: Vec2,
        start: f32,
        sweep: f32,
        stroke: Color,
        fill: Color,
    ) {
        self.push(Primitive::Arc(ArcCmd { origin, size, start, sweep, kind, stroke, fill }));
    }
}
