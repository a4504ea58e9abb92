// Shared fixtures for the host-side tests.

#![allow(dead_code)]

use dance_core::{parse_bvh, AudioTransport, MotionClip};

/// Hips with a full 6-channel root, a rotating Chest and an End Site above it.
/// Frame 1 moves the hips 10 along x and turns the chest 90° about z.
pub const TWO_BONES: &str = "HIERARCHY
ROOT Hips
{
  OFFSET 0.0 0.0 0.0
  CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation
  JOINT Chest
  {
    OFFSET 0.0 10.0 0.0
    CHANNELS 3 Zrotation Xrotation Yrotation
    End Site
    {
      OFFSET 0.0 5.0 0.0
    }
  }
}
MOTION
Frames: 2
Frame Time: 0.0333333
0 0 0 0 0 0 0 0 0
10 0 0 0 0 0 90 0 0
";

/// A single root joint walking along +x by `step` units per frame.
pub fn walking_bvh(frames: usize, step: f32) -> String {
    let mut src = String::from(
        "HIERARCHY\nROOT Hips\n{\n  OFFSET 0 0 0\n  CHANNELS 3 Xposition Yposition Zposition\n  End Site\n  {\n    OFFSET 0 20 0\n  }\n}\nMOTION\n",
    );
    src.push_str(&format!("Frames: {frames}\nFrame Time: 0.1\n"));
    for i in 0..frames {
        src.push_str(&format!("{} 0 0\n", i as f32 * step));
    }
    src
}

pub fn two_bones_clip() -> MotionClip {
    MotionClip::new(parse_bvh(TWO_BONES).unwrap()).unwrap()
}

pub fn walking_clip(frames: usize, step: f32) -> MotionClip {
    MotionClip::new(parse_bvh(&walking_bvh(frames, step)).unwrap()).unwrap()
}

/// Transport whose position the test sets by hand; records the last speed.
#[derive(Default)]
pub struct FakeTransport {
    pub position: f32,
    pub speeds: Vec<f32>,
}

impl AudioTransport for FakeTransport {
    fn position(&self) -> f32 {
        self.position
    }

    fn set_speed(&mut self, speed: f32) {
        self.speeds.push(speed);
    }
}

pub fn approx(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}

pub fn approx_vec(a: glam::Vec3, b: glam::Vec3, eps: f32) -> bool {
    (a - b).abs().max_element() <= eps
}
