use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{Primitive, SceneBuffer};

/// Closed polygon payload. The last point connects back to the first.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonCmd {
    pub points: Vec<Vec2>,
    pub stroke: Color,
    pub fill: Color,
}

/// Open polyline payload.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineCmd {
    pub points: Vec<Vec2>,
    pub color: Color,
}

impl SceneBuffer {
    /// Records a closed polygon.
    #[inline]
    pub fn push_polygon(&mut self, points: Vec<Vec2>, stroke: Color, fill: Color) {
        self.push(Primitive::Polygon(PolygonCmd { points, stroke, fill }));
    }

    /// Records an open polyline.
    #[inline]
    pub fn push_polyline(&mut self, points: Vec<Vec2>, color: Color) {
        self.push(Primitive::Polyline(PolylineCmd { points, color }));
    }
}
