//! # Camera Module
//!
//! The player's view orientation: yaw/pitch state, the derived basis
//! vectors movement is built from, and the third-person camera offset.

use cgmath::{InnerSpace, Point3, Vector3};
use std::f32::consts::FRAC_PI_2;

/// Scale applied to raw mouse deltas before the sensitivity multiplier.
const MOUSE_SCALE: f32 = 0.002;

/// Distance of the third-person camera behind the player.
const THIRD_PERSON_DISTANCE: f32 = 5.0;

/// Height of the third-person camera above the player.
const THIRD_PERSON_LIFT: f32 = 2.0;

/// The player's view orientation.
///
/// Yaw rotates around the world Y axis, pitch around the view-right axis.
/// With yaw and pitch both zero the camera looks down negative Z.
#[derive(Debug, Clone)]
pub struct Camera {
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
}

impl Camera {
    /// Creates a level camera facing negative Z.
    pub fn new() -> Self {
        Camera {
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 1.0,
        }
    }

    /// Current yaw in radians.
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Current pitch in radians.
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Restores a saved orientation.
    pub fn set_orientation(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Mouse-look sensitivity multiplier.
    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Adjusts the mouse-look sensitivity multiplier.
    pub fn set_sensitivity(&mut self, sensitivity: f32) {
        self.sensitivity = sensitivity;
    }

    /// Applies an accumulated mouse delta to the orientation.
    ///
    /// Pitch is clamped to +/- pi/2 so the view cannot flip over the
    /// vertical.
    pub fn apply_mouse_delta(&mut self, delta_x: f64, delta_y: f64) {
        let scale = self.sensitivity * MOUSE_SCALE;
        self.yaw -= delta_x as f32 * scale;
        self.pitch -= delta_y as f32 * scale;
        self.pitch = self.pitch.clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// The full view direction, including pitch.
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        Vector3::new(-yaw_sin * pitch_cos, pitch_sin, -yaw_cos * pitch_cos).normalize()
    }

    /// The view direction flattened onto the horizontal plane.
    ///
    /// This is the forward basis for movement; the vertical component is
    /// dropped so looking up or down never changes ground speed.
    pub fn forward_flat(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        Vector3::new(-yaw_sin, 0.0, -yaw_cos)
    }

    /// The rightward movement basis vector.
    pub fn right(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        Vector3::new(yaw_cos, 0.0, -yaw_sin)
    }

    /// The third-person camera offset: a fixed backward-and-up vector
    /// rotated into the current yaw heading.
    pub fn third_person_offset(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        Vector3::new(
            THIRD_PERSON_DISTANCE * yaw_sin,
            THIRD_PERSON_LIFT,
            THIRD_PERSON_DISTANCE * yaw_cos,
        )
    }

    /// Camera placement for a given logical (first-person) position.
    pub fn position_for(&self, logical: Point3<f32>, third_person: bool) -> Point3<f32> {
        if third_person {
            logical + self.third_person_offset()
        } else {
            logical
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn level_camera_faces_negative_z() {
        let camera = Camera::new();
        let forward = camera.forward();
        assert!(close(forward.x, 0.0) && close(forward.y, 0.0) && close(forward.z, -1.0));
        let right = camera.right();
        assert!(close(right.x, 1.0) && close(right.z, 0.0));
    }

    #[test]
    fn pitch_clamps_at_the_vertical() {
        let mut camera = Camera::new();
        camera.apply_mouse_delta(0.0, -100_000.0);
        assert!(close(camera.pitch(), FRAC_PI_2));
        camera.apply_mouse_delta(0.0, 100_000.0);
        assert!(close(camera.pitch(), -FRAC_PI_2));
    }

    #[test]
    fn forward_flat_ignores_pitch() {
        let mut camera = Camera::new();
        camera.apply_mouse_delta(0.0, 300.0);
        assert!(camera.pitch() < 0.0);
        let flat = camera.forward_flat();
        assert!(close(flat.y, 0.0));
        assert!(close(flat.magnitude(), 1.0));
    }

    #[test]
    fn third_person_offset_stays_behind_the_view() {
        let mut camera = Camera::new();
        // Facing -Z, the camera hangs back toward +Z and up.
        let offset = camera.third_person_offset();
        assert!(close(offset.x, 0.0));
        assert!(close(offset.y, 2.0));
        assert!(close(offset.z, 5.0));

        // After a quarter turn the horizontal offset follows the yaw.
        camera.set_orientation(FRAC_PI_2, 0.0);
        let turned = camera.third_person_offset();
        assert!(close(turned.x, 5.0));
        assert!(close(turned.z, 0.0));
    }
}
