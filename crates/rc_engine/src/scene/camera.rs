//! # Camera
//!
//! Read-only view of the scene for one traversal pass: where the eye is, what
//! it can see (frustum) and how far away things are (depth sort keys).
//!
//! Matrices use the right-handed, Y-up convention with clip-space depth in
//! `[-1, 1]`, which is what the frustum extraction in
//! [`crate::scene::Frustum::from_matrix`] expects.

use crate::foundation::math::{orthographic_off_center, Mat4, Point3, Vec3};
use crate::scene::scene_graph::Frustum;

/// Projection model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection
    Perspective {
        /// Vertical field of view in radians
        fov: f32,
        /// Width over height
        aspect: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
    /// Orthographic projection over an off-center box
    Orthographic {
        /// Left edge
        left: f32,
        /// Right edge
        right: f32,
        /// Bottom edge
        bottom: f32,
        /// Top edge
        top: f32,
        /// Near clip distance
        near: f32,
        /// Far clip distance
        far: f32,
    },
}

/// 3D camera for perspective and orthographic projections
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,

    /// Point the camera is looking at in world space
    pub target: Vec3,

    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,

    /// Projection parameters
    pub projection: Projection,
}

impl Camera {
    /// Create a perspective camera looking at the origin
    ///
    /// # Arguments
    /// * `position` - Camera position in world space
    /// * `fov_degrees` - Vertical field of view in degrees
    /// * `aspect` - Aspect ratio (width / height) of the viewport
    /// * `near` - Distance to near clipping plane (must be > 0)
    /// * `far` - Distance to far clipping plane (must be > near)
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: Projection::Perspective {
                fov: fov_degrees.to_radians(),
                aspect,
                near,
                far,
            },
        }
    }

    /// Create an orthographic camera at the origin looking down -Z
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::zeros(),
            target: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::new(0.0, 1.0, 0.0),
            projection: Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            },
        }
    }

    /// Pixel-space camera for a `width` x `height` viewport, origin top-left
    pub fn screen_space(width: f32, height: f32) -> Self {
        Self::orthographic(0.0, width, height, 0.0, -1.0, 1.0)
    }

    /// Update camera position in world space
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        log::trace!("Camera position updated to: {:?}", position);
    }

    /// Update camera target (look-at point)
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
        log::trace!("Camera target updated to: {:?}", target);
    }

    /// Set target and up vector together
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
    }

    /// Update the aspect ratio; orthographic cameras ignore it
    pub fn set_aspect_ratio(&mut self, new_aspect: f32) {
        if let Projection::Perspective { aspect, .. } = &mut self.projection {
            if (*aspect - new_aspect).abs() > 0.01 {
                log::info!("Camera aspect ratio changed: {:.3} -> {:.3}", aspect, new_aspect);
            }
            *aspect = new_aspect;
        }
    }

    /// World-to-camera transform
    pub fn get_view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(&Point3::from(self.position), &Point3::from(self.target), &self.up)
    }

    /// Camera-to-clip transform
    pub fn get_projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov, aspect, near, far } => Mat4::new_perspective(aspect, fov, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => orthographic_off_center(left, right, bottom, top, near, far),
        }
    }

    /// Combined world-to-clip transform, `P * V`
    pub fn get_view_projection_matrix(&self) -> Mat4 {
        self.get_projection_matrix() * self.get_view_matrix()
    }

    /// World-space frustum
    pub fn frustum(&self) -> Frustum {
        Frustum::from_matrix(&self.get_view_projection_matrix())
    }

    /// Distance from the eye to a world-space point
    pub fn distance_to(&self, point: &Vec3) -> f32 {
        (point - self.position).magnitude()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_view_moves_eye_to_origin() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 60.0, 1.0, 0.1, 100.0);
        let eye = camera.get_view_matrix().transform_point(&Point3::new(0.0, 0.0, 10.0));
        assert_relative_eq!(eye, Point3::origin(), epsilon = 1e-5);

        let origin = camera.get_view_matrix().transform_point(&Point3::origin());
        assert_relative_eq!(origin.z, -10.0, epsilon = 1e-5);
    }

    #[test]
    fn test_distance_to() {
        let camera = Camera::perspective(Vec3::new(3.0, 4.0, 0.0), 60.0, 1.0, 0.1, 100.0);
        assert_relative_eq!(camera.distance_to(&Vec3::zeros()), 5.0);
    }

    #[test]
    fn test_aspect_ratio_only_affects_perspective() {
        let mut camera = Camera::perspective(Vec3::new(0.0, 0.0, 5.0), 60.0, 1.0, 0.1, 100.0);
        camera.set_aspect_ratio(2.0);
        assert!(matches!(camera.projection, Projection::Perspective { aspect, .. } if aspect == 2.0));

        let mut screen = Camera::screen_space(800.0, 600.0);
        screen.set_aspect_ratio(2.0);
        assert_eq!(screen, Camera::screen_space(800.0, 600.0));
    }
}
