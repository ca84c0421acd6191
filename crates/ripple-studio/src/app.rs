use ripple_engine::camera::Camera;
use ripple_engine::core::{App, AppControl, FrameCtx};
use ripple_engine::input::Key;
use ripple_engine::paint::Color;
use ripple_engine::sim::SimulationParameters;
use ripple_engine::water::{BackendKind, WaterEffect};

/// Smoothing interval used when toggled on without one configured.
const DEFAULT_SMOOTHING: u32 = 2;

/// Demo application: one water surface filling the window.
///
/// Keys: `Esc` quits, `R` resets the field, `S` toggles smoothing, `Space`
/// pauses the simulation.
pub struct StudioApp {
    params: SimulationParameters,
    backend: BackendKind,
    clear: Color,

    /// Built on the first frame, once a GPU context exists.
    effect: Option<WaterEffect>,
    last_smoothing: u32,
    paused: bool,
}

impl StudioApp {
    pub fn new(params: SimulationParameters, backend: BackendKind, clear: Color) -> Self {
        let last_smoothing = params.smoothing.unwrap_or(DEFAULT_SMOOTHING);
        Self {
            params,
            backend,
            clear,
            effect: None,
            last_smoothing,
            paused: false,
        }
    }

    fn handle_keys(&mut self, ctx: &FrameCtx<'_, '_>, effect: &mut WaterEffect) {
        let frame = ctx.input_frame;

        if frame.key_pressed(Key::Char('r')) {
            effect.reset();
            log::info!("field reset (seed {})", effect.seed());
        }

        if frame.key_pressed(Key::Char('s')) {
            let mut params = effect.params().clone();
            params.smoothing = match params.smoothing {
                Some(n) => {
                    self.last_smoothing = n;
                    None
                }
                None => Some(self.last_smoothing),
            };
            match effect.reconfigure(params) {
                Ok(()) => log::info!("smoothing: {:?}", effect.params().smoothing),
                Err(e) => log::warn!("could not toggle smoothing: {e}"),
            }
        }

        if frame.key_pressed(Key::Space) {
            self.paused = !self.paused;
            log::info!("simulation {}", if self.paused { "paused" } else { "resumed" });
        }
    }
}

impl App for StudioApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        if self.effect.is_none() {
            match WaterEffect::new(ctx.gpu, self.params.clone(), Camera::default(), self.backend) {
                Ok(effect) => {
                    ctx.window
                        .set_title(&format!("ripple ({} backend)", effect.backend()));
                    self.effect = Some(effect);
                }
                Err(e) => {
                    log::error!("failed to create water effect: {e}");
                    return AppControl::Exit;
                }
            }
        }

        let Some(mut effect) = self.effect.take() else {
            return AppControl::Exit;
        };
        self.handle_keys(ctx, &mut effect);

        let paused = self.paused;
        let input = ctx.input;
        let time = ctx.time;
        let control = ctx.render(self.clear, |rctx, target| {
            if !paused {
                effect.update(rctx, target, input, &time);
            }
            effect.render(rctx, target);
        });

        self.effect = Some(effect);
        control
    }

    fn on_exit(&mut self) {
        if let Some(effect) = &self.effect {
            log::info!(
                "exiting after {} steps on the {} backend",
                effect.steps(),
                effect.backend()
            );
        }
    }
}
