use crate::{Mat4, Quat, Vec3};

/// Pose of the displayed model: a turntable spin about world +Y combined
/// with a uniform scale. The model always sits at the origin; the camera
/// does the traveling.
#[derive(Clone, Copy, Debug)]
pub struct ModelPose {
    /// Accumulated spin angle around +Y, radians.
    pub angle_y: f32,
    /// Uniform scale factor.
    pub scale: f32,
}

impl ModelPose {
    #[inline]
    pub fn new(scale: f32) -> Self {
        Self {
            angle_y: 0.0,
            scale,
        }
    }

    /// Advance the turntable by `rate` rad/s over `dt` seconds.
    #[inline]
    pub fn spin(&mut self, rate: f32, dt: f32) {
        self.angle_y += rate * dt;
    }

    /// Model matrix = R_y * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.scale),
            Quat::from_rotation_y(self.angle_y),
            Vec3::ZERO,
        )
    }
}

impl Default for ModelPose {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_angle_is_pure_scale() {
        let pose = ModelPose::new(2.0);
        let m = pose.matrix().to_cols_array();
        assert!((m[0] - 2.0).abs() < 1e-6);
        assert!((m[5] - 2.0).abs() < 1e-6);
        assert!((m[10] - 2.0).abs() < 1e-6);
        // No translation.
        assert!((m[12]).abs() < 1e-6 && (m[13]).abs() < 1e-6 && (m[14]).abs() < 1e-6);
    }

    #[test]
    fn spin_accumulates_rate_times_dt() {
        let mut pose = ModelPose::new(0.2);
        pose.spin(1.5, 0.5);
        pose.spin(1.5, 0.5);
        assert!((pose.angle_y - 1.5).abs() < 1e-6);
    }

    #[test]
    fn spin_preserves_uniform_scale() {
        let mut pose = ModelPose::new(0.2);
        pose.spin(50f32.to_radians(), 0.75);
        let m = pose.matrix().to_cols_array();
        // Column lengths of the upper 3x3 equal the scale factor.
        for col in [0, 4, 8] {
            let len = (m[col] * m[col] + m[col + 1] * m[col + 1] + m[col + 2] * m[col + 2]).sqrt();
            assert!((len - 0.2).abs() < 1e-6);
        }
    }

    #[test]
    fn full_turn_matches_zero_angle() {
        let rest = ModelPose::new(0.2);
        let mut turned = ModelPose::new(0.2);
        turned.spin(std::f32::consts::TAU, 1.0);
        let a = rest.matrix().to_cols_array();
        let b = turned.matrix().to_cols_array();
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-5);
        }
    }
}
