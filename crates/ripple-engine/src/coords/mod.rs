//! Screen-space coordinate types.
//!
//! Canonical CPU space for pointer input:
//! - Logical pixels (DPI-aware)
//! - Origin top-left
//! - +X right, +Y down
//!
//! World-space math uses `glam` directly.

mod viewport;

pub use viewport::Viewport;
