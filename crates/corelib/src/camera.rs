use crate::{Mat4, Vec3};

/// Pitch saturates here so `front` never degenerates at the poles.
pub const PITCH_LIMIT_DEG: f32 = 89.0;
/// Zoom (vertical FOV) range in degrees.
pub const ZOOM_MIN_DEG: f32 = 1.0;
pub const ZOOM_MAX_DEG: f32 = 45.0;

/// Movement directions relative to the current camera orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Free-flying perspective camera (right-handed).
///
/// Orientation is stored as yaw/pitch in degrees; `front` is derived from
/// them and only recomputed inside [`FlyCamera::apply_look`]. `zoom` is the
/// vertical field of view in degrees.
#[derive(Clone, Copy, Debug)]
pub struct FlyCamera {
    pub position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    zoom: f32,
    pub movement_speed: f32,
    pub look_sensitivity: f32,
    pub scroll_sensitivity: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        // Yaw of -90 deg looks down -Z, matching the initial `front`.
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            front: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            zoom: ZOOM_MAX_DEG,
            movement_speed: 2.5,
            look_sensitivity: 0.1,
            scroll_sensitivity: 1.0,
        }
    }
}

impl FlyCamera {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    #[inline]
    pub fn front(&self) -> Vec3 {
        self.front
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Accumulate a pointer-motion delta into yaw/pitch and rederive `front`.
    ///
    /// Pitch saturates at ±[`PITCH_LIMIT_DEG`]; yaw is unbounded. This is the
    /// only place `front` is mutated.
    pub fn apply_look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.look_sensitivity;
        self.pitch = (self.pitch + dy * self.look_sensitivity)
            .clamp(-PITCH_LIMIT_DEG, PITCH_LIMIT_DEG);

        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }

    /// Accumulate a scroll delta into the vertical FOV, saturating at the
    /// zoom range bounds.
    pub fn apply_scroll(&mut self, dy: f32) {
        self.zoom = (self.zoom - dy * self.scroll_sensitivity).clamp(ZOOM_MIN_DEG, ZOOM_MAX_DEG);
    }

    /// Move along one camera-relative axis for `dt` seconds.
    ///
    /// Calling this several times in one frame combines the axes additively;
    /// the combined displacement is intentionally not renormalized.
    pub fn apply_move(&mut self, direction: MoveDirection, dt: f32) {
        let velocity = self.movement_speed * dt;
        let right = self.front.cross(self.up).normalize();
        match direction {
            MoveDirection::Forward => self.position += self.front * velocity,
            MoveDirection::Backward => self.position -= self.front * velocity,
            MoveDirection::Left => self.position -= right * velocity,
            MoveDirection::Right => self.position += right * velocity,
            MoveDirection::Up => self.position += self.up * velocity,
            MoveDirection::Down => self.position -= self.up * velocity,
        }
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    #[inline]
    pub fn proj(&self, aspect: f32, z_near: f32, z_far: f32) -> Mat4 {
        Mat4::perspective_rh(self.zoom.to_radians(), aspect.max(1e-6), z_near, z_far)
    }
}
