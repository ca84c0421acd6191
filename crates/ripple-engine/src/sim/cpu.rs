use glam::Vec2;

use super::schedule::{StepPlan, StepSchedule};
use super::{stencil, HeightField, PingPong, SimError, SimulationParameters};

/// Height-field simulation on the CPU.
///
/// Runs the same stencil as the compute shader. Used when the adapter cannot
/// run the GPU simulator, and directly in tests.
#[derive(Debug, Clone)]
pub struct CpuSimulator {
    params: SimulationParameters,
    buffers: PingPong<HeightField>,
    schedule: StepSchedule,
}

impl CpuSimulator {
    /// Creates a simulator seeded with noise.
    ///
    /// `seed` overrides `params.seed` (callers resolve the entropy fallback).
    pub fn new(params: SimulationParameters, seed: u64) -> Result<Self, SimError> {
        params.validate()?;
        let initial = HeightField::noise(params.resolution, params.noise_amplitude, seed);
        Ok(Self::from_field(params, initial))
    }

    /// Creates a simulator from an explicit initial field.
    ///
    /// # Panics
    /// In debug builds, if the field side does not match `params.resolution`.
    pub fn from_field(params: SimulationParameters, initial: HeightField) -> Self {
        debug_assert_eq!(initial.side(), params.resolution);
        let schedule = StepSchedule::new(params.frame_skip, params.smoothing);
        Self {
            buffers: PingPong::new(initial.clone(), initial),
            params,
            schedule,
        }
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// The most recently completed field.
    pub fn current(&self) -> &HeightField {
        self.buffers.read()
    }

    /// Consumes one rendered frame; steps according to the schedule.
    ///
    /// Returns what was run so callers know whether to re-upload.
    pub fn advance(&mut self, pointer: Vec2) -> StepPlan {
        let plan = self.schedule.advance();
        if plan.step {
            self.step(pointer);
        }
        if plan.smooth {
            self.smooth();
        }
        plan
    }

    /// One update step, ignoring the schedule.
    pub fn step(&mut self, pointer: Vec2) {
        let (read, write) = self.buffers.split();
        stencil::update(read, write, pointer, &self.params);
        self.buffers.swap();
    }

    /// One smoothing pass, ignoring the schedule.
    pub fn smooth(&mut self) {
        let (read, write) = self.buffers.split();
        stencil::smooth(read, write);
        self.buffers.swap();
    }

    /// Steps taken under the schedule.
    pub fn steps(&self) -> u64 {
        self.schedule.steps()
    }
}
