//! Camera.

use glam::{Mat4, Vec3};

/// Projection settings.
#[derive(Clone, Debug)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        fov_y: f32,
        aspect: f32,
        near: f32,
        far: f32,
    },
    /// Orthographic projection.
    Orthographic {
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    },
}

/// A camera positioned in world space, looking at a target.
#[derive(Clone, Debug)]
pub struct Camera {
    /// Camera position in world space.
    pub position: Vec3,
    /// Point the camera looks at.
    pub target: Vec3,
    /// Projection settings.
    pub projection: Projection,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 6.0, 10.0),
            target: Vec3::ZERO,
            projection: Projection::Perspective {
                fov_y: 70.0_f32.to_radians(),
                aspect: 16.0 / 9.0,
                near: 0.1,
                far: 200.0,
            },
        }
    }
}

impl Camera {
    /// Creates a camera with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the aspect ratio after a resize. No-op for orthographic
    /// projections.
    pub fn set_aspect(&mut self, aspect: f32) {
        if let Projection::Perspective {
            fov_y, near, far, ..
        } = self.projection
        {
            self.projection = Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            };
        }
    }

    /// World-to-view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    /// View-to-clip matrix with the Vulkan Y-flip applied.
    pub fn projection_matrix(&self) -> Mat4 {
        let mut proj = match self.projection {
            Projection::Perspective {
                fov_y,
                aspect,
                near,
                far,
            } => Mat4::perspective_rh(fov_y, aspect, near, far),
            Projection::Orthographic {
                left,
                right,
                bottom,
                top,
                near,
                far,
            } => Mat4::orthographic_rh(left, right, bottom, top, near, far),
        };
        proj.y_axis.y *= -1.0;
        proj
    }

    /// Premultiplied `proj * view`.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn projection_flips_y() {
        let camera = Camera::default();
        let proj = camera.projection_matrix();
        assert!(proj.y_axis.y < 0.0);
    }

    #[test]
    fn view_matrix_moves_target_to_negative_z() {
        let camera = Camera {
            position: Vec3::new(0.0, 0.0, 5.0),
            target: Vec3::ZERO,
            ..Camera::default()
        };
        let viewed = camera.view_matrix() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!(viewed.z < 0.0);
        assert!((viewed.z + 5.0).abs() < 1e-5);
    }

    #[test]
    fn set_aspect_updates_perspective() {
        let mut camera = Camera::default();
        camera.set_aspect(2.0);
        match camera.projection {
            Projection::Perspective { aspect, .. } => assert_eq!(aspect, 2.0),
            _ => panic!("expected perspective"),
        }
    }
}
