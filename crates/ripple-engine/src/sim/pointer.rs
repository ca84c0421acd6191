use glam::Vec2;

use crate::camera::Camera;
use crate::coords::Viewport;

/// Pointer coordinate meaning "no pointer": far enough that the influence
/// term is zero everywhere on any sane plane.
pub const POINTER_SENTINEL: Vec2 = Vec2::new(10_000.0, 10_000.0);

/// Pointer snapshot taken at the start of a simulated frame.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerState {
    /// Window position in logical pixels, `None` when outside the window.
    pub screen: Option<Vec2>,

    /// Projection onto the water plane in simulation space, or the sentinel.
    pub plane: Vec2,
}

impl Default for PointerState {
    fn default() -> Self {
        Self { screen: None, plane: POINTER_SENTINEL }
    }
}

impl PointerState {
    pub fn is_active(&self) -> bool {
        self.plane != POINTER_SENTINEL
    }
}

/// Maps window pointer positions onto the horizontal water plane `y = 0`.
///
/// Simulation space is the plane's local frame: `(world.x, -world.z)`.
#[derive(Debug, Copy, Clone)]
pub struct PointerProjector {
    pub plane_height: f32,
}

impl Default for PointerProjector {
    fn default() -> Self {
        Self { plane_height: 0.0 }
    }
}

impl PointerProjector {
    /// Projects a logical-pixel position; the sentinel when nothing is hit.
    pub fn project(&self, camera: &Camera, viewport: Viewport, screen: Option<Vec2>) -> Vec2 {
        screen
            .and_then(|p| viewport.to_ndc(p.x, p.y))
            .and_then(|ndc| camera.ray_through_ndc(ndc, viewport.aspect()))
            .and_then(|ray| ray.intersect_horizontal_plane(self.plane_height))
            .map(|hit| Vec2::new(hit.x, -hit.z))
            .unwrap_or(POINTER_SENTINEL)
    }

    pub fn snapshot(&self, camera: &Camera, viewport: Viewport, screen: Option<Vec2>) -> PointerState {
        PointerState { screen, plane: self.project(camera, viewport, screen) }
    }
}

/// Eases the projected pointer toward its target.
///
/// The blend factor is `min(dt * 10 * speed, 1)`. After the pointer leaves
/// (or on first use) the next valid position is taken as-is so the trail does
/// not sweep in from the sentinel.
#[derive(Debug, Clone)]
pub struct PointerSmoother {
    speed: f32,
    smoothed: Vec2,
    velocity: Vec2,
    needs_reset: bool,
}

impl PointerSmoother {
    pub fn new(speed: f32) -> Self {
        Self {
            speed,
            smoothed: POINTER_SENTINEL,
            velocity: Vec2::ZERO,
            needs_reset: true,
        }
    }

    pub fn update(&mut self, target: Vec2, dt: f32) -> Vec2 {
        if target == POINTER_SENTINEL {
            self.needs_reset = true;
            self.velocity = Vec2::ZERO;
            self.smoothed = POINTER_SENTINEL;
            return POINTER_SENTINEL;
        }

        if self.needs_reset {
            self.smoothed = target;
            self.needs_reset = false;
        }

        let prev = self.smoothed;
        let l = (dt * 10.0 * self.speed).min(1.0);
        self.smoothed = prev.lerp(target, l);
        self.velocity = self.smoothed - prev;
        self.smoothed
    }

    /// Movement of the smoothed point during the last update.
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VP: Viewport = Viewport::new(800.0, 600.0);

    #[test]
    fn screen_centre_projects_to_plane_origin() {
        let p = PointerProjector::default().project(&Camera::default(), VP, Some(Vec2::new(400.0, 300.0)));
        assert!(p.length() < 1e-3, "{p:?}");
    }

    #[test]
    fn lower_screen_maps_to_positive_world_z() {
        // Lower on screen is closer to the camera (+z), i.e. negative plane y.
        let p = PointerProjector::default().project(&Camera::default(), VP, Some(Vec2::new(400.0, 500.0)));
        assert!(p.y < 0.0, "{p:?}");
        assert!(p.x.abs() < 1e-3);
    }

    #[test]
    fn absent_pointer_or_bad_viewport_is_sentinel() {
        let proj = PointerProjector::default();
        let cam = Camera::default();
        assert_eq!(proj.project(&cam, VP, None), POINTER_SENTINEL);
        assert_eq!(
            proj.project(&cam, Viewport::new(0.0, 0.0), Some(Vec2::ZERO)),
            POINTER_SENTINEL
        );
        assert!(!proj.snapshot(&cam, VP, None).is_active());
    }

    #[test]
    fn pointer_above_horizon_is_sentinel() {
        let cam = Camera::default()
            .with_position(glam::Vec3::new(0.0, 1.0, 5.0))
            .with_target(glam::Vec3::new(0.0, 1.0, 0.0));
        let p = PointerProjector::default().project(&cam, VP, Some(Vec2::new(400.0, 10.0)));
        assert_eq!(p, POINTER_SENTINEL);
    }

    #[test]
    fn smoother_snaps_then_eases() {
        let mut s = PointerSmoother::new(1.0);
        assert_eq!(s.update(Vec2::new(1.0, 1.0), 0.016), Vec2::new(1.0, 1.0));

        let p = s.update(Vec2::new(2.0, 1.0), 0.05);
        assert!((p.x - 1.5).abs() < 1e-5);
        assert!((s.velocity().x - 0.5).abs() < 1e-5);

        assert_eq!(s.update(POINTER_SENTINEL, 0.016), POINTER_SENTINEL);
        assert_eq!(s.update(Vec2::new(-3.0, 0.0), 0.016), Vec2::new(-3.0, 0.0));
    }

    #[test]
    fn large_dt_catches_up_fully() {
        let mut s = PointerSmoother::new(1.0);
        s.update(Vec2::ZERO, 0.0);
        assert_eq!(s.update(Vec2::new(4.0, 4.0), 1.0), Vec2::new(4.0, 4.0));
    }
}
