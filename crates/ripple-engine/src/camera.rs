//! Perspective camera and screen-ray casting.

use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera looking at a fixed target.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    /// Vertical field of view, radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 4.0, 5.0),
            target: Vec3::ZERO,
            fov_y: 70f32.to_radians(),
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up())
    }

    /// wgpu clip space (depth in `[0, 1]`).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, aspect, self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }

    /// Casts a world-space ray through a point in normalized device coordinates.
    ///
    /// Returns `None` if the view-projection matrix is not invertible.
    pub fn ray_through_ndc(&self, ndc: Vec2, aspect: f32) -> Option<Ray> {
        let view_proj = self.view_projection(aspect);
        if view_proj.determinant().abs() <= f32::EPSILON {
            return None;
        }
        let inv = view_proj.inverse();

        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        let dir = (far - near).try_normalize()?;

        Some(Ray { origin: near, dir })
    }

    // Straight up/down views fall back to +Z so `look_at` stays well-defined.
    fn up(&self) -> Vec3 {
        let forward = (self.target - self.position).normalize_or_zero();
        if forward.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::NEG_Z
        } else {
            Vec3::Y
        }
    }
}

/// Half-line `origin + t * dir`, `t >= 0`, `dir` normalized.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    /// Intersects the horizontal plane `y = height`.
    ///
    /// Returns `None` when the ray is parallel to the plane or the plane lies
    /// behind the origin.
    pub fn intersect_horizontal_plane(&self, height: f32) -> Option<Vec3> {
        if self.dir.y.abs() < 1e-6 {
            return None;
        }
        let t = (height - self.origin.y) / self.dir.y;
        if t < 0.0 || !t.is_finite() {
            return None;
        }
        Some(self.origin + self.dir * t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn centre_ray_hits_target_on_plane() {
        let cam = Camera::default();
        let ray = cam.ray_through_ndc(Vec2::ZERO, 16.0 / 9.0).unwrap();
        let hit = ray.intersect_horizontal_plane(0.0).unwrap();
        assert!(approx(hit, Vec3::ZERO), "hit = {hit:?}");
    }

    #[test]
    fn ray_above_horizon_misses_plane() {
        let cam = Camera::default()
            .with_position(Vec3::new(0.0, 1.0, 5.0))
            .with_target(Vec3::new(0.0, 1.0, 0.0));
        let ray = cam.ray_through_ndc(Vec2::new(0.0, 0.5), 1.0).unwrap();
        assert!(ray.dir.y > 0.0);
        assert_eq!(ray.intersect_horizontal_plane(0.0), None);
    }

    #[test]
    fn horizontal_ray_is_parallel() {
        let ray = Ray { origin: Vec3::new(0.0, 1.0, 0.0), dir: Vec3::X };
        assert_eq!(ray.intersect_horizontal_plane(0.0), None);
    }

    #[test]
    fn top_down_camera_is_well_defined() {
        let cam = Camera::default().with_position(Vec3::new(0.0, 10.0, 0.0));
        let ray = cam.ray_through_ndc(Vec2::ZERO, 1.0).unwrap();
        let hit = ray.intersect_horizontal_plane(0.0).unwrap();
        assert!(approx(hit, Vec3::ZERO));
    }
}
