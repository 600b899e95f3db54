//! Core types: math re-exports, model pose, FlyCamera.

pub use glam::{Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod transform;

pub use camera::{FlyCamera, MoveDirection};
pub use transform::ModelPose;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_and_camera_compose_to_finite_mvp() {
        let mut pose = ModelPose::new(0.2);
        pose.spin(50f32.to_radians(), 0.016);
        let cam = FlyCamera::default();
        let mvp = cam.proj(16.0 / 9.0, 0.1, 100.0) * cam.view() * pose.matrix();
        assert!(mvp.to_cols_array().iter().all(|f| f.is_finite()));
    }
}
