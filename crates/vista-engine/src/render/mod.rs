//! GPU rendering subsystem.
//!
//! - `MeshBuffer` owns an immutable vertex buffer and its layout
//! - `Drawable` shapes share a mesh and issue the draw call
//! - `ShapeRenderer` owns pipelines + the view uniform and runs the pass
//!
//! Convention: vertices are world units; the vertex shader maps them to NDC
//! with the `size`, `scale` and `location` uniforms.

mod ctx;
mod mesh;
mod renderer;
pub mod shader;
mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::{MeshBuffer, MeshError, VertexLayout};
pub use renderer::ShapeRenderer;
pub use shapes::{build_shape, fan_indices, loop_indices, Drawable, FilledShape, OutlineShape, ShapeKind, StripShape};
