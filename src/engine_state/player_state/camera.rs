//! # Camera
//!
//! The first-person view derived from the player body each tick. The camera
//! never drives the body; it is rebuilt from position, eye height, yaw and
//! pitch, and handed to the targeter and to the presentation layer.
//!
//! Orientation convention: yaw 0 looks along +X, positive yaw turns toward +Z,
//! positive pitch looks up.

use cgmath::{InnerSpace, Matrix4, Point3, Rad, Vector3};

/// A first-person camera in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis)
    pub yaw: Rad<f32>,
    /// Vertical rotation, within [-π/2, π/2]
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a camera at `position` with the given orientation.
    ///
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_sandbox::engine_state::player_state::camera::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.0, 1.6, 0.0), Deg(0.0), Deg(0.0));
    /// assert!((camera.forward().x - 1.0).abs() < 1e-6);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        }
    }

    /// Unit vector the camera looks along (pitch included).
    pub fn forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// Horizontal forward direction (pitch excluded).
    pub fn flat_forward(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(yaw_cos, 0.0, yaw_sin)
    }

    /// Horizontal right direction.
    pub fn right(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        Vector3::new(-yaw_sin, 0.0, yaw_cos)
    }

    /// Calculates the view matrix for this camera.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_to_rh(self.position, self.forward(), Vector3::unit_y())
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use cgmath::{Deg, Transform};

    use super::*;

    #[test]
    fn forward_follows_yaw_and_pitch() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Rad(FRAC_PI_2), Rad(0.0));
        let forward = camera.forward();
        assert!(forward.x.abs() < 1e-6);
        assert!((forward.z - 1.0).abs() < 1e-6);

        let up = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(90.0)).forward();
        assert!((up.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn right_is_perpendicular_to_flat_forward() {
        let camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(37.0), Deg(-20.0));
        assert!(camera.right().dot(camera.flat_forward()).abs() < 1e-6);
        assert!((camera.flat_forward().magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_puts_the_eye_at_the_origin() {
        let camera = Camera::new(Point3::new(3.0, 5.0, -2.0), Deg(10.0), Deg(5.0));
        let eye = camera.calc_matrix().transform_point(camera.position);
        assert!(eye.x.abs() < 1e-4 && eye.y.abs() < 1e-4 && eye.z.abs() < 1e-4);
    }
}
