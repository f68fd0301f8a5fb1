//! # Player State
//!
//! This module holds the player's body and the logic that turns a tick's
//! `PlayerAction` into a velocity:
//! - `PlayerBody`: position, velocity, orientation, grounded flag, dimensions
//! - `PlayerMode`: the Walk/Fly state machine
//! - `camera`: the view derived from the body
//! - `collision`: integration of the velocity against the world
//!
//! ## Per-tick flow
//! 1. `look` applies pointer motion to yaw and pitch
//! 2. `apply_input` derives the velocity from movement flags and mode
//! 3. `CollisionResolver::resolve` moves the body and sets `on_ground`
//!
//! Nothing outside the simulation tick mutates the body.

pub mod camera;
pub mod collision;

use std::f32::consts::FRAC_PI_2;

use cgmath::{InnerSpace, Point3, Rad, Vector2, Vector3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::application_state::{
    input_state::PlayerAction,
    settings::{PhysicsSettings, PlayerSettings},
};
use camera::Camera;

/// Movement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerMode {
    /// Gravity, jumping, collisions.
    Walk,
    /// No gravity; vertical speed comes straight from up/down input.
    Fly,
}

impl PlayerMode {
    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            PlayerMode::Walk => PlayerMode::Fly,
            PlayerMode::Fly => PlayerMode::Walk,
        }
    }
}

/// The simulated player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBody {
    /// Feet position.
    pub position: Point3<f32>,
    /// Units per second.
    pub velocity: Vector3<f32>,
    /// Horizontal view angle.
    pub yaw: Rad<f32>,
    /// Vertical view angle, within [-π/2, π/2].
    pub pitch: Rad<f32>,
    /// Resting on a solid surface.
    pub on_ground: bool,
    /// Feet to top of head.
    pub height: f32,
    /// Horizontal probe distance.
    pub radius: f32,
    /// Camera height above the feet.
    pub eye_height: f32,
    /// Current movement mode.
    pub mode: PlayerMode,
}

impl PlayerBody {
    /// Creates a body at rest at the configured spawn.
    pub fn new(settings: &PlayerSettings) -> Self {
        let [x, y, z] = settings.spawn;
        PlayerBody {
            position: Point3::new(x, y, z),
            velocity: Vector3::new(0.0, 0.0, 0.0),
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            on_ground: false,
            height: settings.height,
            radius: settings.radius,
            eye_height: settings.eye_height,
            mode: if settings.start_flying {
                PlayerMode::Fly
            } else {
                PlayerMode::Walk
            },
        }
    }

    /// The view from the body's eyes.
    pub fn camera(&self) -> Camera {
        let eye = Point3::new(
            self.position.x,
            self.position.y + self.eye_height,
            self.position.z,
        );
        Camera::new(eye, self.yaw, self.pitch)
    }

    /// Switches between Walk and Fly.
    ///
    /// Entering Fly zeroes vertical velocity. Horizontal velocity is kept
    /// across both transitions.
    pub fn toggle_mode(&mut self) -> PlayerMode {
        self.mode = self.mode.toggled();
        if self.mode == PlayerMode::Fly {
            self.velocity.y = 0.0;
            self.on_ground = false;
        }
        debug!("Player mode is now {:?}", self.mode);
        self.mode
    }

    /// Turns the view by a pointer delta. Pitch is clamped to ±π/2.
    pub fn look(&mut self, delta: (f64, f64), sensitivity: f32) {
        let (dx, dy) = delta;
        self.yaw += Rad(dx as f32 * sensitivity);
        self.pitch = Rad((self.pitch.0 - dy as f32 * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2));
    }

    /// Derives this tick's velocity from the movement flags.
    ///
    /// `dt` must already be clamped; it only scales gravity.
    pub fn apply_input(&mut self, action: &PlayerAction, physics: &PhysicsSettings, dt: f32) {
        let mut wish = Vector2::new(0.0f32, 0.0);
        if action.move_forward {
            wish.y += 1.0;
        }
        if action.move_backward {
            wish.y -= 1.0;
        }
        if action.move_right {
            wish.x += 1.0;
        }
        if action.move_left {
            wish.x -= 1.0;
        }

        if wish.magnitude2() > 0.0 {
            let wish = wish.normalize();
            let camera = self.camera();
            let direction = camera.flat_forward() * wish.y + camera.right() * wish.x;
            let (speed, control) = match self.mode {
                PlayerMode::Fly => (physics.fly_speed, 1.0),
                PlayerMode::Walk if self.on_ground => (physics.walk_speed, 1.0),
                PlayerMode::Walk => (physics.walk_speed, physics.air_control),
            };
            self.velocity.x = direction.x * speed * control;
            self.velocity.z = direction.z * speed * control;
        } else {
            self.velocity.x *= physics.friction;
            self.velocity.z *= physics.friction;
        }

        match self.mode {
            PlayerMode::Fly => {
                self.velocity.y = match (action.move_up, action.move_down) {
                    (true, false) => physics.fly_speed,
                    (false, true) => -physics.fly_speed,
                    _ => 0.0,
                };
            }
            PlayerMode::Walk => {
                self.velocity.y += physics.gravity * dt;
                if action.move_up && self.on_ground {
                    self.velocity.y = physics.jump_force;
                    self.on_ground = false;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> PlayerBody {
        PlayerBody::new(&PlayerSettings::default())
    }

    fn forward() -> PlayerAction {
        PlayerAction {
            move_forward: true,
            ..PlayerAction::default()
        }
    }

    #[test]
    fn walking_forward_at_yaw_zero_moves_along_x() {
        let mut body = body();
        body.on_ground = true;
        body.apply_input(&forward(), &PhysicsSettings::default(), 0.016);
        assert!((body.velocity.x - 8.0).abs() < 1e-5);
        assert!(body.velocity.z.abs() < 1e-5);
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let mut body = body();
        body.on_ground = true;
        let action = PlayerAction {
            move_forward: true,
            move_right: true,
            ..PlayerAction::default()
        };
        body.apply_input(&action, &PhysicsSettings::default(), 0.016);
        let horizontal = Vector2::new(body.velocity.x, body.velocity.z).magnitude();
        assert!((horizontal - 8.0).abs() < 1e-4);
    }

    #[test]
    fn airborne_walk_uses_air_control() {
        let mut body = body();
        body.apply_input(&forward(), &PhysicsSettings::default(), 0.016);
        assert!((body.velocity.x - 8.0 * 0.2).abs() < 1e-5);
    }

    #[test]
    fn no_input_decays_horizontal_velocity() {
        let mut body = body();
        body.velocity = Vector3::new(10.0, 0.0, -5.0);
        body.apply_input(&PlayerAction::default(), &PhysicsSettings::default(), 0.016);
        assert!((body.velocity.x - 8.0).abs() < 1e-5);
        assert!((body.velocity.z + 4.0).abs() < 1e-5);
    }

    #[test]
    fn jump_only_from_the_ground() {
        let physics = PhysicsSettings::default();
        let jump = PlayerAction {
            move_up: true,
            ..PlayerAction::default()
        };

        let mut airborne = body();
        airborne.apply_input(&jump, &physics, 0.1);
        assert!((airborne.velocity.y + 2.5).abs() < 1e-5);

        let mut grounded = body();
        grounded.on_ground = true;
        grounded.apply_input(&jump, &physics, 0.1);
        assert_eq!(grounded.velocity.y, 8.0);
        assert!(!grounded.on_ground);
    }

    #[test]
    fn fly_vertical_speed_does_not_persist() {
        let physics = PhysicsSettings::default();
        let mut body = body();
        body.toggle_mode();
        body.apply_input(
            &PlayerAction {
                move_up: true,
                ..PlayerAction::default()
            },
            &physics,
            0.016,
        );
        assert_eq!(body.velocity.y, 12.0);
        body.apply_input(&PlayerAction::default(), &physics, 0.016);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn walk_fly_walk_keeps_horizontal_velocity() {
        let mut body = body();
        body.velocity = Vector3::new(3.0, -7.0, 1.5);
        assert_eq!(body.toggle_mode(), PlayerMode::Fly);
        assert_eq!(body.velocity, Vector3::new(3.0, 0.0, 1.5));
        body.velocity.y = 4.0;
        assert_eq!(body.toggle_mode(), PlayerMode::Walk);
        assert_eq!(body.velocity, Vector3::new(3.0, 4.0, 1.5));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut body = body();
        body.look((0.0, -1.0e6), 0.002);
        assert_eq!(body.pitch, Rad(FRAC_PI_2));
        body.look((0.0, 1.0e6), 0.002);
        assert_eq!(body.pitch, Rad(-FRAC_PI_2));
        body.look((500.0, 0.0), 0.002);
        assert!((body.yaw.0 - 1.0).abs() < 1e-6);
    }
}
