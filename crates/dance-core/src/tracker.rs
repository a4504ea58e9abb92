use std::collections::VecDeque;

use glam::Vec3;

use crate::constants::{TRAIL_CAPACITY, TRAIL_FADE_FAR, TRAIL_FADE_NEAR};
use crate::math::map_range;
use crate::motion::{JointRef, MotionClip};

/// One piece of a trail strip, from the newer point to the older one.
/// Opacity is per end so the strip shades smoothly along its length.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrailSegment {
    pub from: Vec3,
    pub to: Vec3,
    pub from_alpha: f32,
    pub to_alpha: f32,
}

/// Keeps the most recent positions of one joint, newest first.
#[derive(Clone, Debug)]
pub struct JointTracker {
    joint: JointRef,
    points: VecDeque<Vec3>,
    capacity: usize,
}

impl JointTracker {
    pub fn new(joint: JointRef) -> Self {
        Self::with_capacity(joint, TRAIL_CAPACITY)
    }

    pub fn with_capacity(joint: JointRef, capacity: usize) -> Self {
        Self {
            joint,
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn joint(&self) -> JointRef {
        self.joint
    }

    pub fn points(&self) -> &VecDeque<Vec3> {
        &self.points
    }

    /// Samples the bound joint if its clip produced a new frame this tick.
    pub fn update(&mut self, clips: &[MotionClip]) {
        if let Some(clip) = clips.get(self.joint.clip) {
            self.observe(clip.is_frame_new(), clip.joint_position(self.joint.joint));
        }
    }

    /// Records `position` at the front when `frame_new`, evicting the oldest
    /// point beyond capacity. Does nothing otherwise.
    pub fn observe(&mut self, frame_new: bool, position: Vec3) {
        if !frame_new {
            return;
        }
        self.points.push_front(position);
        if self.points.len() > self.capacity {
            self.points.pop_back();
        }
    }

    /// Opacity of each strip vertex, newest first. The oldest point only
    /// anchors the last distance and is not drawn, so there is one entry
    /// fewer than there are points.
    pub fn strip_alphas(&self) -> Vec<f32> {
        if self.points.len() < 2 {
            return Vec::new();
        }
        let last = (self.points.len() - 1) as f32;
        self.points
            .iter()
            .zip(self.points.iter().skip(1))
            .enumerate()
            .map(|(i, (&p0, &p1))| {
                let along = map_range(i as f32, 0.0, last, 1.0, 0.0, true);
                let hop =
                    map_range(p0.distance(p1), TRAIL_FADE_NEAR, TRAIL_FADE_FAR, 0.0, 1.0, true);
                along * hop
            })
            .collect()
    }

    /// The trail as a line strip split into segments, with opacity fading
    /// towards the tail and suppressed for short hops between samples.
    pub fn trail_segments(&self) -> Vec<TrailSegment> {
        let alphas = self.strip_alphas();
        alphas
            .windows(2)
            .enumerate()
            .map(|(i, a)| TrailSegment {
                from: self.points[i],
                to: self.points[i + 1],
                from_alpha: a[0],
                to_alpha: a[1],
            })
            .collect()
    }
}

/// One tracker per joint, clip by clip.
pub fn trackers_for(clips: &[MotionClip]) -> Vec<JointTracker> {
    clips
        .iter()
        .enumerate()
        .flat_map(|(clip, c)| {
            (0..c.num_joints()).map(move |joint| JointTracker::new(JointRef { clip, joint }))
        })
        .collect()
}
