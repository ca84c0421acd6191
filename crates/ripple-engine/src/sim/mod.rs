//! Height-field water simulation.
//!
//! A square grid of `(height, prev_height)` texels advanced once per simulated
//! frame by a damped wave stencil, with a pointer-driven depression and an
//! optional smoothing pass. Every step reads one buffer and writes the other
//! (`PingPong`), on the CPU (`CpuSimulator`) or in compute shaders
//! (`GpuSimulator`).

mod cpu;
mod error;
mod field;
mod gpu;
mod params;
mod ping_pong;
mod pointer;
mod schedule;
pub mod stencil;
mod texture;

pub use cpu::CpuSimulator;
pub use error::SimError;
pub use field::{HeightField, Texel};
pub use gpu::GpuSimulator;
pub use params::{SimulationParameters, StencilKind, MIN_RESOLUTION};
pub use ping_pong::PingPong;
pub use pointer::{PointerProjector, PointerSmoother, PointerState, POINTER_SENTINEL};
pub use schedule::{StepPlan, StepSchedule};
pub use texture::HeightTexture;
