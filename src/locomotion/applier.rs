use glam::Vec3;

use crate::camera::{Camera, CameraPose};

/// Moves the live camera toward the walker's target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseApplier {
    factor: f32,
}

impl PoseApplier {
    /// `factor` in (0, 1]; 1 snaps straight to the target
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    pub fn factor(&self) -> f32 {
        self.factor
    }

    /// One smoothing step on position. Orientation is left alone.
    pub fn apply(&self, camera: &mut Camera, target: Vec3) {
        camera.position += (target - camera.position) * self.factor;
    }

    /// Put back the pose saved at activation, exactly
    pub fn restore(&self, camera: &mut Camera, pose: CameraPose) {
        camera.set_pose(pose);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converges_without_overshoot() {
        for factor in [0.1, 0.5, 0.9] {
            let applier = PoseApplier::new(factor);
            let mut camera = Camera::new(Vec3::ZERO, 0.0, 0.0);
            let target = Vec3::new(10.0, -4.0, 3.0);
            let mut last = (target - camera.position).length();

            for _ in 0..200 {
                applier.apply(&mut camera, target);
                let remaining = target - camera.position;
                // Same side of the target on every axis
                assert!(remaining.x >= 0.0 && remaining.y <= 0.0 && remaining.z >= 0.0);
                assert!(remaining.length() <= last);
                last = remaining.length();
            }
            assert!(last < 1e-3, "factor {} did not converge", factor);
        }
    }

    #[test]
    fn test_factor_one_snaps() {
        let applier = PoseApplier::new(1.0);
        let mut camera = Camera::new(Vec3::ZERO, 0.3, 0.1);
        applier.apply(&mut camera, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(camera.yaw, 0.3);
        assert_eq!(camera.pitch, 0.1);
    }

    #[test]
    fn test_restore_is_exact() {
        let applier = PoseApplier::new(0.5);
        let original = Camera::default();
        let mut camera = original;
        camera.position += Vec3::splat(7.0);
        camera.yaw = 1.0;

        applier.restore(&mut camera, original.pose());

        assert_eq!(camera, original);
    }
}
