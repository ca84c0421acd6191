//! Ripple engine crate.
//!
//! Owns the platform + GPU runtime and the height-field water simulation
//! driven by it. The demo binary only composes these pieces.

pub mod device;
pub mod window;
pub mod input;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod paint;
pub mod camera;
pub mod render;
pub mod sim;
pub mod water;
