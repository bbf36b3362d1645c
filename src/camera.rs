//! Orbit camera.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

const MAX_PITCH: f32 = 89.0 * std::f32::consts::PI / 180.0;
const MIN_DISTANCE: f32 = 2.0;

/// Camera orbiting a fixed target point, driven by mouse drag and wheel.
///
/// Yaw and pitch are spherical angles around the target; pitch is clamped
/// short of the poles so the up vector never degenerates.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub target: Vec3,
    distance: f32,
    yaw: f32,
    pitch: f32,
}

impl OrbitCamera {
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance: distance.max(MIN_DISTANCE),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Rotate around the target by the given angle deltas (radians).
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(-MAX_PITCH, MAX_PITCH);
    }

    /// Move toward (positive) or away from (negative) the target.
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance - delta).max(MIN_DISTANCE);
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// World-space camera position on the orbit sphere.
    ///
    /// At yaw 0, pitch 0 the camera sits on the -Z axis looking toward +Z,
    /// matching the left-handed view convention.
    pub fn eye(&self) -> Vec3 {
        let offset = Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            -self.pitch.cos() * self.yaw.cos(),
        );
        self.target + offset * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye(), self.target, Vec3::UP)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 8.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_sits_behind_the_target() {
        let camera = OrbitCamera::default();
        let eye = camera.eye();
        assert_relative_eq!(eye.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(eye.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(eye.z, -8.0, epsilon = 1e-5);
    }

    #[test]
    fn pitch_is_clamped_short_of_the_poles() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 10.0);
        let eye = camera.eye();
        // Never exactly on the pole, so look_at keeps a valid basis.
        assert!(eye.y < camera.distance());
        let view = camera.view_matrix();
        let t = view.transform_point(camera.target);
        assert_relative_eq!(t.z, camera.distance(), epsilon = 1e-4);
    }

    #[test]
    fn zoom_never_passes_through_the_target() {
        let mut camera = OrbitCamera::default();
        camera.zoom(100.0);
        assert!(camera.distance() >= 2.0);
    }

    #[test]
    fn eye_stays_on_the_orbit_sphere() {
        let mut camera = OrbitCamera::new(Vec3::new(1.0, 2.0, 3.0), 5.0);
        camera.orbit(1.3, -0.7);
        let radius = (camera.eye() - camera.target).magnitude();
        assert_relative_eq!(radius, 5.0, epsilon = 1e-5);
    }
}
