//! Playback of one skeletal clip.
//!
//! A [`MotionClip`] is scrubbed by frame or by normalized position and only
//! re-solves its pose in [`MotionClip::update`]. The `frame_new` flag is raised
//! by the update that applied a changed frame and cleared by the next one.

use std::path::Path;

use glam::{Mat4, Quat, Vec3};

use crate::bvh::{load_bvh, Bvh, Channel};
use crate::{Result, SketchError};

/// Identifies one joint of one clip inside a slice of clips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointRef {
    pub clip: usize,
    pub joint: usize,
}

#[derive(Debug)]
pub struct MotionClip {
    bvh: Bvh,
    globals: Vec<Mat4>,
    current_frame: usize,
    pending: bool,
    frame_new: bool,
}

impl MotionClip {
    pub fn new(bvh: Bvh) -> Result<Self> {
        if bvh.joints.is_empty() || bvh.num_frames() == 0 {
            return Err(SketchError::BvhStructure("clip has no joints or frames".into()));
        }
        let globals = vec![Mat4::IDENTITY; bvh.joints.len()];
        let mut clip = Self {
            bvh,
            globals,
            current_frame: 0,
            pending: true,
            frame_new: false,
        };
        clip.solve_pose();
        // the initial pose is announced by the first update
        clip.pending = true;
        Ok(clip)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(load_bvh(path)?)
    }

    pub fn num_joints(&self) -> usize {
        self.bvh.joints.len()
    }

    pub fn num_frames(&self) -> usize {
        self.bvh.num_frames()
    }

    pub fn frame_time(&self) -> f32 {
        self.bvh.frame_time
    }

    /// Length of the clip in seconds.
    pub fn duration(&self) -> f32 {
        self.num_frames() as f32 * self.bvh.frame_time
    }

    /// Playback position in seconds.
    pub fn time(&self) -> f32 {
        self.current_frame as f32 * self.bvh.frame_time
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn is_frame_new(&self) -> bool {
        self.frame_new
    }

    /// Selects a frame; out-of-range indices are ignored and the current
    /// frame is held.
    pub fn set_frame(&mut self, frame: usize) {
        if frame >= self.num_frames() || frame == self.current_frame {
            return;
        }
        self.current_frame = frame;
        self.pending = true;
    }

    /// Selects the frame at `position` in `[0, 1)` of the clip.
    pub fn set_position(&mut self, position: f32) {
        if !(0.0..1.0).contains(&position) {
            return;
        }
        let frame = (position * self.num_frames() as f32) as usize;
        self.set_frame(frame);
    }

    /// Applies a pending frame change and reports it through `is_frame_new`.
    pub fn update(&mut self) {
        self.frame_new = false;
        if self.pending {
            self.solve_pose();
            self.frame_new = true;
        }
    }

    pub fn joint_name(&self, joint: usize) -> Option<&str> {
        self.bvh.joints.get(joint).map(|j| j.name.as_str())
    }

    pub fn joint_parent(&self, joint: usize) -> Option<usize> {
        self.bvh.joints.get(joint).and_then(|j| j.parent)
    }

    /// World position of `joint` in the current pose.
    pub fn joint_position(&self, joint: usize) -> Vec3 {
        self.globals
            .get(joint)
            .map(|m| m.w_axis.truncate())
            .unwrap_or(Vec3::ZERO)
    }

    /// Parent-to-child segments of the current pose.
    pub fn bones(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.bvh.joints.iter().enumerate().filter_map(|(i, j)| {
            j.parent
                .map(|p| (self.joint_position(p), self.joint_position(i)))
        })
    }

    fn solve_pose(&mut self) {
        let values = self.bvh.frame(self.current_frame);
        for (i, joint) in self.bvh.joints.iter().enumerate() {
            let mut translation = joint.offset;
            let mut rotation = Quat::IDENTITY;
            for (k, channel) in joint.channels.iter().enumerate() {
                let v = values[joint.channel_start + k];
                match channel {
                    Channel::Xposition => translation.x += v,
                    Channel::Yposition => translation.y += v,
                    Channel::Zposition => translation.z += v,
                    Channel::Xrotation => rotation *= Quat::from_rotation_x(v.to_radians()),
                    Channel::Yrotation => rotation *= Quat::from_rotation_y(v.to_radians()),
                    Channel::Zrotation => rotation *= Quat::from_rotation_z(v.to_radians()),
                }
            }
            let local = Mat4::from_rotation_translation(rotation, translation);
            // parents precede children in file order
            self.globals[i] = match joint.parent {
                Some(p) => self.globals[p] * local,
                None => local,
            };
        }
        self.pending = false;
    }
}
