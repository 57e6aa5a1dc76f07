//! GPU rendering subsystem.
//!
//! Shape renderers turn `scene` commands into instance buffers; the
//! [`SceneRenderer`] replays them in paint order inside one render pass.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shader converts to NDC using a viewport uniform.

mod ctx;
mod scene;
pub mod shapes;

pub use ctx::{RenderCtx, RenderTarget};
pub use scene::SceneRenderer;
