use crate::scene::shapes::{
    ArcCmd, EllipseCmd, ImageCmd, LineCmd, PointCmd, PointsCmd, PolygonCmd, PolylineCmd, TextCmd,
};

/// Renderer-agnostic drawing instruction.
///
/// Extending the scene:
/// - add a new shape module under `scene::shapes::*`
/// - add a new variant here
/// - implement the push helper inside that shape module
/// - teach `render::tessellate` (or a dedicated batch) how to paint it
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line(LineCmd),
    Ellipse(EllipseCmd),
    Arc(ArcCmd),
    Polygon(PolygonCmd),
    Polyline(PolylineCmd),
    Text(TextCmd),
    Point(PointCmd),
    Points(PointsCmd),
    Image(ImageCmd),
}

impl Primitive {
    /// Short shape name, used in trace logs.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Primitive::Line(_) => "line",
            Primitive::Ellipse(_) => "ellipse",
            Primitive::Arc(a) => a.kind.name(),
            Primitive::Polygon(_) => "polygon",
            Primitive::Polyline(_) => "polyline",
            Primitive::Text(_) => "text",
            Primitive::Point(_) => "point",
            Primitive::Points(_) => "points",
            Primitive::Image(_) => "image",
        }
    }
}
