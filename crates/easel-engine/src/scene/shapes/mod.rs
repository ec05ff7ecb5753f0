pub(crate) mod arc;
pub(crate) mod ellipse;
pub(crate) mod image;
pub(crate) mod line;
pub(crate) mod point;
pub(crate) mod polygon;
pub(crate) mod text;

pub use arc::{ArcCmd, ArcKind};
pub use ellipse::EllipseCmd;
pub use image::{ImageCmd, ImageData};
pub use line::LineCmd;
pub use point::{PointCmd, PointsCmd};
pub use polygon::{PolygonCmd, PolylineCmd};
pub use text::TextCmd;
