//! GPU rendering subsystem.
//!
//! `SceneRenderer` consumes a `scene::SceneBuffer` and issues GPU commands via
//! wgpu. Primitives are painted in issue order inside one render pass; each
//! run of same-kind primitives becomes one batch.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport uniform.

mod common;
mod ctx;
mod image;
mod mesh;
mod scene_renderer;
mod tessellate;
mod text;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene_renderer::SceneRenderer;
pub use tessellate::{tessellate, triangulate, Mesh, MeshVertex};
