use glam::Vec2;

use crate::camera::Camera;
use crate::device::{Gpu, GpuCapabilities};
use crate::input::InputState;
use crate::render::{RenderCtx, RenderTarget, WaterMaterial, WaterRenderer};
use crate::sim::{
    CpuSimulator, GpuSimulator, HeightField, HeightTexture, PointerProjector, PointerSmoother,
    PointerState, SimError, SimulationParameters, StepPlan, MIN_RESOLUTION,
};
use crate::time::FrameTime;

use super::backend::{resolve_seed, ActiveBackend, BackendKind};

/// Seconds between debug stat lines.
const STATS_INTERVAL: f32 = 1.0;

/// Grid side of the static surface.
const STATIC_SIDE: u32 = MIN_RESOLUTION;

enum Simulation {
    Gpu(GpuSimulator),
    Cpu {
        sim: CpuSimulator,
        texture: HeightTexture,
    },
    Static {
        texture: HeightTexture,
    },
}

impl Simulation {
    fn gpu(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        caps: &GpuCapabilities,
        params: &SimulationParameters,
        seed: u64,
    ) -> Result<Self, SimError> {
        GpuSimulator::new(device, queue, caps, params.clone(), seed).map(Simulation::Gpu)
    }

    fn cpu(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        caps: &GpuCapabilities,
        params: &SimulationParameters,
        seed: u64,
    ) -> Result<Self, SimError> {
        check_texture_size(caps, params)?;
        let sim = CpuSimulator::new(params.clone(), seed)?;
        let texture = HeightTexture::new(
            device,
            params.resolution,
            wgpu::TextureUsages::empty(),
            "ripple height cpu",
        );
        texture.upload(queue, sim.current());
        Ok(Simulation::Cpu { sim, texture })
    }

    /// Motionless surface. A flat field renders the same at any resolution,
    /// so the smallest grid is used whatever `resolution` asks for.
    fn flat(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let texture = HeightTexture::new(
            device,
            STATIC_SIDE,
            wgpu::TextureUsages::empty(),
            "ripple height static",
        );
        texture.upload(queue, &HeightField::flat(STATIC_SIDE, 0.0));
        Simulation::Static { texture }
    }

    fn kind(&self) -> ActiveBackend {
        match self {
            Simulation::Gpu(_) => ActiveBackend::Gpu,
            Simulation::Cpu { .. } => ActiveBackend::Cpu,
            Simulation::Static { .. } => ActiveBackend::Static,
        }
    }

    fn texture(&self) -> &HeightTexture {
        match self {
            Simulation::Gpu(sim) => sim.current(),
            Simulation::Cpu { texture, .. } | Simulation::Static { texture } => texture,
        }
    }

    fn steps(&self) -> u64 {
        match self {
            Simulation::Gpu(sim) => sim.steps(),
            Simulation::Cpu { sim, .. } => sim.steps(),
            Simulation::Static { .. } => 0,
        }
    }
}

fn check_texture_size(caps: &GpuCapabilities, params: &SimulationParameters) -> Result<(), SimError> {
    if params.resolution > caps.max_texture_dimension_2d {
        return Err(SimError::Unsupported(format!(
            "{}x{} height texture (max {})",
            params.resolution, params.resolution, caps.max_texture_dimension_2d
        )));
    }
    Ok(())
}

/// Pointer-driven water surface for one window.
///
/// Per frame: `update` samples the pointer once and advances the simulation
/// (recording compute work into the frame encoder on the GPU backend), then
/// `render` draws the current height texture. Rendering never mutates the
/// simulation.
pub struct WaterEffect {
    device: wgpu::Device,
    queue: wgpu::Queue,
    caps: GpuCapabilities,

    requested: BackendKind,
    params: SimulationParameters,
    seed: u64,
    sim: Simulation,

    camera: Camera,
    projector: PointerProjector,
    smoother: Option<PointerSmoother>,
    pointer: PointerState,

    renderer: WaterRenderer,

    stats_since: f32,
    stats_steps: u64,
}

impl WaterEffect {
    /// Builds the effect on `gpu`.
    ///
    /// Fails only for invalid `params`. A backend the adapter cannot run is
    /// logged at `warn` and replaced by the next one in the chain
    /// (GPU, CPU, static).
    pub fn new(
        gpu: &Gpu<'_>,
        params: SimulationParameters,
        camera: Camera,
        requested: BackendKind,
    ) -> Result<Self, SimError> {
        Self::with_device(
            gpu.device().clone(),
            gpu.queue().clone(),
            gpu.capabilities().clone(),
            params,
            camera,
            requested,
        )
    }

    /// Builds the effect on a device without a surface (offscreen or tests).
    pub fn with_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        caps: GpuCapabilities,
        params: SimulationParameters,
        camera: Camera,
        requested: BackendKind,
    ) -> Result<Self, SimError> {
        params.validate()?;

        let seed = resolve_seed(params.seed);
        let sim = build_simulation(&device, &queue, &caps, &params, requested, seed);
        log::info!(
            "water: {} backend, {}x{} cells, seed {seed}",
            sim.kind(),
            params.resolution,
            params.resolution,
        );

        Ok(Self {
            device,
            queue,
            caps,
            requested,
            smoother: params.pointer_lerp.map(PointerSmoother::new),
            params,
            seed,
            sim,
            camera,
            projector: PointerProjector::default(),
            pointer: PointerState::default(),
            renderer: WaterRenderer::new(WaterMaterial::default()),
            stats_since: 0.0,
            stats_steps: 0,
        })
    }

    /// Backend the simulation ended up on.
    pub fn backend(&self) -> ActiveBackend {
        self.sim.kind()
    }

    pub fn params(&self) -> &SimulationParameters {
        &self.params
    }

    /// Seed of the current height field.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn set_camera(&mut self, camera: Camera) {
        self.camera = camera;
    }

    pub fn material(&self) -> &WaterMaterial {
        self.renderer.material()
    }

    pub fn set_material(&mut self, material: WaterMaterial) {
        self.renderer.set_material(material);
    }

    /// Simulation steps since the field was last (re)built.
    pub fn steps(&self) -> u64 {
        self.sim.steps()
    }

    /// Pointer snapshot used by the last `update`.
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    /// Height texture the renderer samples this frame.
    pub fn current_texture(&self) -> &HeightTexture {
        self.sim.texture()
    }

    /// Replaces the parameters and rebuilds the height field.
    ///
    /// Invalid parameters leave the running simulation untouched.
    pub fn reconfigure(&mut self, params: SimulationParameters) -> Result<(), SimError> {
        params.validate()?;
        log::info!("water: reconfiguring ({:?} -> {:?})", self.params, params);
        self.params = params;
        self.rebuild();
        Ok(())
    }

    /// Reinitializes the height field with the current parameters.
    ///
    /// A configured seed reproduces the initial field; otherwise a new one is
    /// drawn.
    pub fn reset(&mut self) {
        log::debug!("water: reset");
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.seed = resolve_seed(self.params.seed);
        self.sim = build_simulation(
            &self.device,
            &self.queue,
            &self.caps,
            &self.params,
            self.requested,
            self.seed,
        );
        self.smoother = self.params.pointer_lerp.map(PointerSmoother::new);
        self.pointer = PointerState::default();
        self.stats_steps = 0;
    }

    /// Samples the pointer and advances the simulation by one rendered frame.
    ///
    /// Must run before `render` within the same frame.
    pub fn update(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        input: &InputState,
        time: &FrameTime,
    ) -> StepPlan {
        let screen = input.pointer_pos.map(|(x, y)| Vec2::new(x, y));
        let mut snapshot = self.projector.snapshot(&self.camera, ctx.viewport, screen);
        if let Some(smoother) = self.smoother.as_mut() {
            snapshot.plane = smoother.update(snapshot.plane, time.dt);
        }
        self.pointer = snapshot;

        let plan = match &mut self.sim {
            Simulation::Gpu(sim) => sim.advance(ctx.queue, target.encoder, snapshot.plane),
            Simulation::Cpu { sim, texture } => {
                let plan = sim.advance(snapshot.plane);
                if plan.step || plan.smooth {
                    texture.upload(ctx.queue, sim.current());
                }
                plan
            }
            Simulation::Static { .. } => StepPlan::default(),
        };

        self.report_stats(time);
        plan
    }

    /// Draws the surface into `target`.
    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>) {
        self.renderer.render(
            ctx,
            target,
            &self.camera,
            self.params.bounds,
            self.sim.texture(),
        );
    }

    fn report_stats(&mut self, time: &FrameTime) {
        if time.elapsed - self.stats_since < STATS_INTERVAL {
            return;
        }
        let window = (time.elapsed - self.stats_since).max(f32::EPSILON);
        let steps = self.sim.steps();
        let rate = steps.saturating_sub(self.stats_steps) as f32 / window;

        match &self.sim {
            Simulation::Cpu { sim, .. } => {
                let (lo, hi) = sim.current().height_range();
                log::debug!(
                    "water: {} steps ({rate:.0}/s), heights [{lo:.4}, {hi:.4}], pointer active={}",
                    steps,
                    self.pointer.is_active(),
                );
            }
            other => log::debug!(
                "water: {} backend, {} steps ({rate:.0}/s), pointer active={}",
                other.kind(),
                steps,
                self.pointer.is_active(),
            ),
        }

        self.stats_since = time.elapsed;
        self.stats_steps = steps;
    }
}

fn build_simulation(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    caps: &GpuCapabilities,
    params: &SimulationParameters,
    requested: BackendKind,
    seed: u64,
) -> Simulation {
    for &kind in requested.candidates() {
        let built = match kind {
            ActiveBackend::Gpu => Simulation::gpu(device, queue, caps, params, seed),
            ActiveBackend::Cpu => Simulation::cpu(device, queue, caps, params, seed),
            ActiveBackend::Static => break,
        };
        match built {
            Ok(sim) => return sim,
            Err(err) => log::warn!("water: {kind} backend unavailable ({err}), falling back"),
        }
    }
    Simulation::flat(device, queue)
}
