//! Slowly orbiting orthographic camera.
//!
//! Units are screen pixels: the floor sits [`CAMERA_LIFT_PX`] below the
//! centre of the view, the dancers are zoomed by [`CAMERA_ZOOM`] and tilted by
//! [`CAMERA_PITCH_DEG`] so the floor is seen from slightly above.

use glam::{Mat4, Vec3};

use crate::cloud::CloudTransform;
use crate::constants::{
    CAMERA_LIFT_PX, CAMERA_PITCH_DEG, CAMERA_ZOOM, LIGHT_POSITION, ORTHO_DEPTH,
};

#[derive(Clone, Copy, Debug)]
pub struct SketchCamera {
    pub width: f32,
    pub height: f32,
    pub yaw_degrees: f32,
}

impl SketchCamera {
    pub fn new(width: f32, height: f32, yaw_degrees: f32) -> Self {
        Self {
            width,
            height,
            yaw_degrees,
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let hw = self.width.max(1.0) * 0.5;
        let hh = self.height.max(1.0) * 0.5;
        Mat4::orthographic_rh(-hw, hw, -hh, hh, -ORTHO_DEPTH, ORTHO_DEPTH)
    }

    /// Model matrix for geometry in mocap units (trails, skeletons).
    pub fn scene_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, -CAMERA_LIFT_PX, 0.0))
            * Mat4::from_rotation_x(CAMERA_PITCH_DEG.to_radians())
            * Mat4::from_rotation_y(self.yaw_degrees.to_radians())
            * Mat4::from_scale(Vec3::splat(CAMERA_ZOOM))
    }

    /// Model matrix for geometry in the unit cube the surface lives in; the
    /// exact inverse of `transform`.
    pub fn surface_matrix(&self, transform: &CloudTransform) -> Mat4 {
        self.scene_matrix()
            * Mat4::from_scale(Vec3::splat(transform.scale))
            * Mat4::from_translation(-transform.offset)
            * Mat4::from_scale(Vec3::new(1.0, transform.y_scale, 1.0))
    }

    pub fn view_proj(&self, model: Mat4) -> Mat4 {
        self.projection_matrix() * model
    }
}

/// Direction towards the key light, in view space.
pub fn light_direction() -> Vec3 {
    Vec3::from(LIGHT_POSITION).normalize()
}
