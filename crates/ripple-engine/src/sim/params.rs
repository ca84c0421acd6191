use serde::{Deserialize, Serialize};

use super::SimError;

/// Update stencil applied to every cell.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StencilKind {
    /// Damped wave equation: `((n + s + e + w) * 0.5 - prev) * viscosity`.
    #[default]
    Wave,
    /// Damped diffusion: `average(n, s, e, w) * viscosity`.
    Diffuse,
}

impl StencilKind {
    pub(crate) fn as_u32(self) -> u32 {
        match self {
            StencilKind::Wave => 0,
            StencilKind::Diffuse => 1,
        }
    }
}

/// Parameters of one simulation instance.
///
/// Immutable for the lifetime of a height field; changing them goes through
/// `reconfigure`, which rebuilds the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationParameters {
    /// Cells per side (`W`).
    pub resolution: u32,

    /// World-space side length of the simulated plane.
    pub bounds: f32,

    /// Radius of the pointer depression, world units.
    pub mouse_size: f32,

    /// Depression depth at the pointer centre (half the peak, see the stencil).
    pub depth: f32,

    /// Multiplicative damping per step.
    pub viscosity: f32,

    pub stencil: StencilKind,

    /// Run the smoothing pass every N steps.
    pub smoothing: Option<u32>,

    /// Step the simulation every N rendered frames.
    pub frame_skip: u32,

    /// Seed for the initial noise; `None` draws one from entropy.
    pub seed: Option<u64>,

    /// Initial heights are uniform in `[0, noise_amplitude)`.
    pub noise_amplitude: f32,

    /// Pointer easing speed; `None` uses the raw pointer.
    pub pointer_lerp: Option<f32>,
}

/// Smallest grid that still has an interior cell.
pub const MIN_RESOLUTION: u32 = 3;

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            resolution: 128,
            bounds: 6.0,
            mouse_size: 0.28,
            depth: 0.004,
            viscosity: 0.96,
            stencil: StencilKind::Wave,
            smoothing: None,
            frame_skip: 1,
            seed: None,
            noise_amplitude: 0.05,
            pointer_lerp: None,
        }
    }
}

impl SimulationParameters {
    /// Checks every field against its valid range.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.resolution < MIN_RESOLUTION {
            return Err(SimError::invalid(
                "resolution",
                format!("{} is below the minimum of {MIN_RESOLUTION}", self.resolution),
            ));
        }
        positive("bounds", self.bounds)?;
        positive("mouse_size", self.mouse_size)?;
        non_negative("depth", self.depth)?;
        non_negative("noise_amplitude", self.noise_amplitude)?;

        if !(self.viscosity > 0.0 && self.viscosity <= 1.0) {
            return Err(SimError::invalid(
                "viscosity",
                format!("{} is outside (0, 1]", self.viscosity),
            ));
        }
        if self.frame_skip == 0 {
            return Err(SimError::invalid("frame_skip", "must be at least 1"));
        }
        if self.smoothing == Some(0) {
            return Err(SimError::invalid("smoothing", "interval must be at least 1"));
        }
        if let Some(speed) = self.pointer_lerp {
            positive("pointer_lerp", speed)?;
        }
        Ok(())
    }

    /// Side length of one cell in world units.
    pub fn cell_size(&self) -> f32 {
        self.bounds / self.resolution as f32
    }

    /// Number of texels in one buffer.
    pub fn cell_count(&self) -> usize {
        self.resolution as usize * self.resolution as usize
    }
}

fn positive(name: &'static str, v: f32) -> Result<(), SimError> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("{v} must be finite and > 0")))
    }
}

fn non_negative(name: &'static str, v: f32) -> Result<(), SimError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(name, format!("{v} must be finite and >= 0")))
    }
}
