use glam::Vec3;

use crate::constants::{cloud_offset_vec3, SURFACE_SCALE, Y_SCALE};
use crate::tracker::JointTracker;

/// Maps mocap-space points into the unit cube the surface generator samples.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CloudTransform {
    pub scale: f32,
    pub offset: Vec3,
    pub y_scale: f32,
}

impl Default for CloudTransform {
    fn default() -> Self {
        Self {
            scale: SURFACE_SCALE,
            offset: cloud_offset_vec3(),
            y_scale: Y_SCALE,
        }
    }
}

impl CloudTransform {
    #[inline]
    pub fn apply(&self, point: Vec3) -> Vec3 {
        let mut p = point / self.scale + self.offset;
        p.y /= self.y_scale;
        p
    }
}

/// Concatenates every tracker's trail into `out`, transformed into surface
/// space. `out` is cleared first.
pub fn gather_cloud(trackers: &[JointTracker], transform: &CloudTransform, out: &mut Vec<Vec3>) {
    out.clear();
    for tracker in trackers {
        out.extend(tracker.points().iter().map(|&p| transform.apply(p)));
    }
}
