//! Perspective camera with pointer drift and click ray casting.

use crate::input::Pointer;
use crate::math::{Mat4, Vec2, Vec3};

/// Fraction of the remaining distance the camera covers each frame.
pub const DRIFT_RATE: f32 = 0.02;
/// Pointer-to-camera offset scale.
pub const DRIFT_SPREAD: f32 = 0.5;

/// A perspective camera looking down -Z.
///
/// The camera only translates; it never rotates, so the view matrix is the
/// inverse translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(aspect: f32) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            fov_y: 75.0,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// Ease the camera's XY toward half the pointer position.
    pub fn drift_toward(&mut self, pointer: Pointer) {
        let target = pointer.as_vec2() * DRIFT_SPREAD;
        self.position.x += (target.x - self.position.x) * DRIFT_RATE;
        self.position.y += (target.y - self.position.y) * DRIFT_RATE;
    }

    pub fn view(&self) -> Mat4 {
        Mat4::from_translation(-self.position)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Cast a ray through normalized device coordinates and intersect it with
    /// the plane `z = plane_z`.
    ///
    /// Returns `None` when the ray runs parallel to the plane or the plane is
    /// behind the camera.
    pub fn ray_to_plane(&self, ndc: Vec2, plane_z: f32) -> Option<Vec3> {
        let inverse = self.view_proj().inverse();
        // Depth 0 is the near plane.
        let near = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let direction = (near - self.position).normalize_or_zero();
        if direction.z.abs() < 1e-6 {
            return None;
        }
        let t = (plane_z - self.position.z) / direction.z;
        if t < 0.0 {
            return None;
        }
        Some(self.position + direction * t)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(16.0 / 9.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drift_covers_two_percent() {
        let mut camera = Camera::new(1.0);
        camera.drift_toward(Pointer::new(1.0, -1.0));
        assert!((camera.position.x - 0.01).abs() < 1e-6);
        assert!((camera.position.y + 0.01).abs() < 1e-6);
        assert_eq!(camera.position.z, 5.0);
    }

    #[test]
    fn center_ray_hits_origin() {
        let camera = Camera::new(1.0);
        let hit = camera.ray_to_plane(Vec2::ZERO, 0.0).unwrap();
        assert!(hit.length() < 1e-4, "hit at {hit:?}");
    }

    #[test]
    fn corner_ray_spreads_with_fov() {
        let camera = Camera::new(1.0);
        let hit = camera.ray_to_plane(Vec2::new(1.0, 1.0), 0.0).unwrap();
        // Half-height of the view at distance 5 with a 75° fov.
        let half = 5.0 * (37.5_f32).to_radians().tan();
        assert!((hit.x - half).abs() < 1e-3);
        assert!((hit.y - half).abs() < 1e-3);
        assert!(hit.z.abs() < 1e-4);
    }

    #[test]
    fn plane_behind_camera_is_rejected() {
        let camera = Camera::new(1.0);
        assert!(camera.ray_to_plane(Vec2::ZERO, 10.0).is_none());
    }
}
