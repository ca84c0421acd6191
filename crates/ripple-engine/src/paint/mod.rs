//! Color model shared by the renderers and the demo configuration.

pub mod color;

pub use color::{Color, ColorParseError};
