//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and create them
//! lazily on first use, re-creating pipelines when the surface format changes.

mod ctx;
mod mesh;
mod water;

pub use ctx::{RenderCtx, RenderTarget};
pub use mesh::PlaneMesh;
pub use water::{WaterMaterial, WaterRenderer};
