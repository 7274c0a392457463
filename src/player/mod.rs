//! # Player Module
//!
//! This module provides the `PlayerController`: explicit-Euler integration
//! of the player's position and velocity against the world's voxel
//! solidity, plus view orientation and the first/third person camera.
//!
//! ## Collision Model
//!
//! Collision is resolved by discrete sampling, not a continuous sweep: a
//! candidate position is accepted only if none of 11 representative points
//! of the player's capsule-approximated bounding box land in a solid voxel.
//! Horizontal and vertical movement are tested independently, so sliding
//! along a wall keeps the unblocked axis. Sampling can tunnel through
//! geometry when `speed * dt` approaches a voxel; that gap is an accepted
//! property of the approach.

use cgmath::{InnerSpace, Point3, Vector3};

use crate::meshing::RenderSink;

pub mod camera;

use camera::Camera;

/// Ground movement speed, in world units per second.
const MOVE_SPEED: f32 = 8.0;

/// Initial vertical velocity of a jump.
const JUMP_SPEED: f32 = 8.0;

/// Gravitational acceleration applied every tick.
const GRAVITY: f32 = -20.0;

/// Height of the player capsule; the logical position is at eye level,
/// the feet sit this far below it.
const PLAYER_HEIGHT: f32 = 1.8;

/// Half the player's horizontal extent.
const PLAYER_HALF_WIDTH: f32 = 0.3;

/// Distance below the logical position of the head-level sample ring.
const HEAD_OFFSET: f32 = 0.1;

/// The directional input flags consumed by one integration tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// Move along the camera's flattened forward vector.
    pub move_forward: bool,
    /// Move against the camera's flattened forward vector.
    pub move_backward: bool,
    /// Strafe against the camera's right vector.
    pub move_left: bool,
    /// Strafe along the camera's right vector.
    pub move_right: bool,
    /// Jump, honored only while grounded.
    pub jump: bool,
}

/// Integrates the player's position and velocity against the voxel grid.
///
/// One instance lives for the whole session. The stored position is the
/// logical first-person (eye) position; perspective toggling only changes
/// where the camera is placed, never the position itself.
pub struct PlayerController {
    position: Point3<f32>,
    velocity: Vector3<f32>,
    camera: Camera,
    grounded: bool,
    can_jump: bool,
    third_person: bool,
    controls_enabled: bool,
}

impl PlayerController {
    /// Creates a controller at the given eye position.
    pub fn new(position: Point3<f32>) -> Self {
        PlayerController {
            position,
            velocity: Vector3::new(0.0, 0.0, 0.0),
            camera: Camera::new(),
            grounded: false,
            can_jump: false,
            third_person: false,
            controls_enabled: true,
        }
    }

    /// The logical (eye-level, first-person) position.
    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    /// Relocates the player, typically on respawn or load.
    pub fn set_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }

    /// The current velocity.
    pub fn velocity(&self) -> Vector3<f32> {
        self.velocity
    }

    /// Zeroes the velocity, used by the respawn path.
    pub fn reset_velocity(&mut self) {
        self.velocity = Vector3::new(0.0, 0.0, 0.0);
    }

    /// Whether the last vertical resolution ended on the ground.
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// The view orientation.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable access to the view orientation.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Whether the third-person perspective is active.
    pub fn is_third_person(&self) -> bool {
        self.third_person
    }

    /// Switches between first and third person.
    ///
    /// The logical position is untouched; the avatar is shown exactly when
    /// the camera leaves the eye position.
    pub fn toggle_perspective(&mut self, sink: &mut dyn RenderSink) {
        self.third_person = !self.third_person;
        sink.set_avatar_visible(self.third_person);
    }

    /// Forces a perspective, used when restoring a session snapshot.
    pub fn set_third_person(&mut self, third_person: bool, sink: &mut dyn RenderSink) {
        if self.third_person != third_person {
            self.toggle_perspective(sink);
        }
    }

    /// Whether input affects the player.
    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    /// Enables or disables control; while disabled the integration tick is
    /// skipped entirely (matching the UI taking keyboard focus).
    pub fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    /// Where the camera actually sits this frame.
    pub fn camera_position(&self) -> Point3<f32> {
        self.camera.position_for(self.position, self.third_person)
    }

    /// The 11 sample points of the capsule-approximated bounding box: four
    /// foot-level corners, four head-level corners, and three points down
    /// the vertical center line.
    fn collision_points(position: Point3<f32>) -> [Point3<f32>; 11] {
        let w = PLAYER_HALF_WIDTH;
        let feet = position.y - PLAYER_HEIGHT;
        let head = position.y - HEAD_OFFSET;
        [
            Point3::new(position.x - w, feet, position.z - w),
            Point3::new(position.x + w, feet, position.z - w),
            Point3::new(position.x - w, feet, position.z + w),
            Point3::new(position.x + w, feet, position.z + w),
            Point3::new(position.x - w, head, position.z - w),
            Point3::new(position.x + w, head, position.z - w),
            Point3::new(position.x - w, head, position.z + w),
            Point3::new(position.x + w, head, position.z + w),
            Point3::new(position.x, feet, position.z),
            Point3::new(position.x, position.y - PLAYER_HEIGHT / 2.0, position.z),
            Point3::new(position.x, head, position.z),
        ]
    }

    /// Whether any sample point of the box at `position` lands in a solid
    /// voxel.
    fn collides<F>(position: Point3<f32>, is_solid: &F) -> bool
    where
        F: Fn(i32, i32, i32) -> bool,
    {
        Self::collision_points(position).iter().any(|p| {
            is_solid(p.x.floor() as i32, p.y.floor() as i32, p.z.floor() as i32)
        })
    }

    /// Advances the player by one tick.
    ///
    /// Applies gravity, builds the movement vector from the camera basis
    /// and the input flags, and resolves the horizontal and vertical
    /// deltas independently against the solidity predicate. A blocked
    /// downward move grounds the player and re-arms jumping; any blocked
    /// vertical move zeroes the vertical velocity.
    pub fn update<F>(&mut self, dt: f32, input: &PlayerInput, is_solid: F)
    where
        F: Fn(i32, i32, i32) -> bool,
    {
        if !self.controls_enabled {
            return;
        }

        if input.jump && self.can_jump {
            self.velocity.y = JUMP_SPEED;
            self.can_jump = false;
        }

        self.velocity.y += GRAVITY * dt;

        let forward = self.camera.forward_flat();
        let right = self.camera.right();
        let mut movement = Vector3::new(0.0, 0.0, 0.0);
        if input.move_forward {
            movement += forward;
        }
        if input.move_backward {
            movement -= forward;
        }
        if input.move_right {
            movement += right;
        }
        if input.move_left {
            movement -= right;
        }
        if movement.magnitude2() > 0.0 {
            movement = movement.normalize() * (MOVE_SPEED * dt);
        }

        let horizontal =
            Point3::new(self.position.x + movement.x, self.position.y, self.position.z + movement.z);
        if !Self::collides(horizontal, &is_solid) {
            self.position.x = horizontal.x;
            self.position.z = horizontal.z;
        }

        let vertical = Point3::new(
            self.position.x,
            self.position.y + self.velocity.y * dt,
            self.position.z,
        );
        if !Self::collides(vertical, &is_solid) {
            self.position.y = vertical.y;
            self.grounded = false;
        } else {
            if self.velocity.y < 0.0 {
                self.grounded = true;
                self.can_jump = true;
            }
            self.velocity.y = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 0.05;

    fn flat_floor(x: i32, y: i32, z: i32) -> bool {
        let _ = (x, z);
        y < 50
    }

    fn settle(player: &mut PlayerController, input: &PlayerInput) {
        for _ in 0..200 {
            player.update(DT, input, flat_floor);
        }
    }

    #[test]
    fn falling_player_lands_and_grounds() {
        let mut player = PlayerController::new(Point3::new(0.5, 60.0, 0.5));
        settle(&mut player, &PlayerInput::default());

        assert!(player.is_grounded());
        assert_eq!(player.velocity().y, 0.0);
        // Feet must rest on or above the floor surface at y = 50.
        assert!(player.position().y - PLAYER_HEIGHT >= 50.0);
    }

    #[test]
    fn wall_blocks_horizontal_movement_without_penetration() {
        let is_solid = |x: i32, y: i32, _z: i32| y < 50 || x >= 3;
        let mut player = PlayerController::new(Point3::new(0.5, 51.9, 0.5));
        // Face positive X so move_forward walks into the wall.
        player.camera_mut().set_orientation(-std::f32::consts::FRAC_PI_2, 0.0);

        let input = PlayerInput {
            move_forward: true,
            ..PlayerInput::default()
        };
        for _ in 0..200 {
            player.update(DT, &input, is_solid);
        }

        // speed * dt = 0.4 per tick, well under one voxel: the box edge
        // must stop short of the wall plane at x = 3.
        assert!(player.position().x + PLAYER_HALF_WIDTH < 3.0);
        assert!(player.position().x > 2.0);
        // The unblocked axes are untouched.
        assert_eq!(player.position().z, 0.5);
    }

    #[test]
    fn jump_is_only_honored_while_grounded() {
        let mut player = PlayerController::new(Point3::new(0.5, 60.0, 0.5));
        settle(&mut player, &PlayerInput::default());
        assert!(player.is_grounded());

        let jump = PlayerInput {
            jump: true,
            ..PlayerInput::default()
        };
        player.update(DT, &jump, flat_floor);
        let rising = player.velocity().y;
        assert!(rising > 0.0);

        // A second jump mid-air must not reset the velocity upward.
        player.update(DT, &jump, flat_floor);
        assert!(player.velocity().y < rising);
    }

    #[test]
    fn disabled_controls_freeze_integration() {
        let mut player = PlayerController::new(Point3::new(0.5, 60.0, 0.5));
        player.set_controls_enabled(false);
        let before = player.position();
        player.update(DT, &PlayerInput::default(), flat_floor);
        assert_eq!(player.position(), before);
    }

    #[test]
    fn perspective_toggle_keeps_the_logical_position() {
        let mut player = PlayerController::new(Point3::new(0.5, 60.0, 0.5));
        let mut sink = crate::meshing::NullRenderSink;
        let logical = player.position();
        assert_eq!(player.camera_position(), logical);

        player.toggle_perspective(&mut sink);
        assert!(player.is_third_person());
        assert_eq!(player.position(), logical);
        assert_ne!(player.camera_position(), logical);

        player.toggle_perspective(&mut sink);
        assert_eq!(player.camera_position(), logical);
    }
}
