//! Interactive water surface.
//!
//! `WaterEffect` ties the pointer projector, a height-field simulator and the
//! water renderer together for one window. The simulator backend is chosen
//! from the adapter's capabilities and degrades instead of failing.

mod backend;
mod effect;

pub use backend::{resolve_seed, ActiveBackend, BackendKind};
pub use effect::WaterEffect;
