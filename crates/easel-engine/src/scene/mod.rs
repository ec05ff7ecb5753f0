//! Scene (draw stream) types.
//!
//! Responsibilities:
//! - store renderer-agnostic drawing primitives for one frame
//! - preserve issue order (primitives paint back-to-front as recorded)
//! - keep shape-specific payloads and push helpers under `scene::shapes`

mod buffer;
mod primitive;

pub mod shapes;

pub use buffer::SceneBuffer;
pub use primitive::Primitive;
pub use shapes::{
    ArcCmd, ArcKind, EllipseCmd, ImageCmd, ImageData, LineCmd, PointCmd, PointsCmd, PolygonCmd,
    PolylineCmd, TextCmd,
};
