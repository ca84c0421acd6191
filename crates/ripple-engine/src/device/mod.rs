//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and providing encoders/views for rendering
//! - reporting adapter capabilities so effects can pick a backend

mod caps;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use caps::GpuCapabilities;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
