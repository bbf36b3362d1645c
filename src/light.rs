//! Directional light.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// A directional light defined by a position and a target, like a spotlight
/// rig without the cone. Only the direction matters to the shading math.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        // Above and behind the camera's default orbit position.
        Self {
            position: Vec3::new(5.0, 10.0, -10.0),
            target: Vec3::ZERO,
        }
    }
}

impl DirectionalLight {
    /// World-space direction the light travels, source toward target.
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Light travel direction in view space. Directions ignore the view
    /// matrix translation.
    pub fn view_direction(&self, view: &Mat4) -> Vec3 {
        view.transform_direction(self.direction()).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn direction_points_from_source_to_target() {
        let light = DirectionalLight {
            position: Vec3::new(0.0, 10.0, 0.0),
            target: Vec3::ZERO,
        };
        let d = light.direction();
        assert_relative_eq!(d.y, -1.0, epsilon = 1e-6);
        assert_relative_eq!(d.magnitude(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_direction_is_unit() {
        let light = DirectionalLight::default();
        let view = Mat4::look_at_lh(Vec3::new(0.0, 0.0, -8.0), Vec3::ZERO, Vec3::UP);
        assert_relative_eq!(light.view_direction(&view).magnitude(), 1.0, epsilon = 1e-5);
    }
}
