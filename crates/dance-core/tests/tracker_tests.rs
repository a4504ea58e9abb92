// Host-side tests for joint trails.

mod common;

use common::*;
use dance_core::{trackers_for, JointRef, JointTracker, TRAIL_CAPACITY};
use glam::Vec3;

fn p(x: f32) -> Vec3 {
    Vec3::new(x, 0.0, 0.0)
}

fn joint() -> JointRef {
    JointRef { clip: 0, joint: 0 }
}

#[test]
fn keeps_the_newest_points_first_up_to_capacity() {
    let mut tracker = JointTracker::new(joint());
    for i in 0..6 {
        tracker.observe(true, p(i as f32));
    }
    assert_eq!(TRAIL_CAPACITY, 4);
    let points: Vec<Vec3> = tracker.points().iter().copied().collect();
    assert_eq!(points, vec![p(5.0), p(4.0), p(3.0), p(2.0)]);
}

#[test]
fn ignores_ticks_without_a_new_frame() {
    let mut tracker = JointTracker::new(joint());
    tracker.observe(true, p(1.0));
    tracker.observe(false, p(2.0));
    tracker.observe(false, p(3.0));
    assert_eq!(tracker.points().len(), 1);
    assert_eq!(tracker.points()[0], p(1.0));
}

#[test]
fn custom_capacity() {
    let mut tracker = JointTracker::with_capacity(joint(), 2);
    for i in 0..5 {
        tracker.observe(true, p(i as f32));
    }
    assert_eq!(tracker.points().len(), 2);
}

#[test]
fn trail_fades_towards_the_tail() {
    let mut tracker = JointTracker::new(joint());
    for i in 0..4 {
        tracker.observe(true, p(i as f32 * 10.0));
    }
    // Long hops are fully visible, so only the position along the trail counts
    let alphas = tracker.strip_alphas();
    assert_eq!(alphas.len(), 3);
    assert!(approx(alphas[0], 1.0, 1e-6));
    assert!(approx(alphas[1], 2.0 / 3.0, 1e-6));
    assert!(approx(alphas[2], 1.0 / 3.0, 1e-6));

    let segments = tracker.trail_segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].from, p(30.0));
    assert_eq!(segments[0].to, p(20.0));
    assert!(approx(segments[0].from_alpha, 1.0, 1e-6));
    assert!(approx(segments[0].to_alpha, 2.0 / 3.0, 1e-6));
    assert!(approx(segments[1].to_alpha, 1.0 / 3.0, 1e-6));
}

#[test]
fn oldest_point_is_not_drawn() {
    let mut tracker = JointTracker::new(joint());
    for i in 0..4 {
        tracker.observe(true, p(i as f32 * 10.0));
    }
    let segments = tracker.trail_segments();
    assert!(segments.iter().all(|s| s.to != p(0.0)));
}

#[test]
fn short_hops_are_hidden() {
    let mut tracker = JointTracker::new(joint());
    tracker.observe(true, p(0.0));
    tracker.observe(true, p(2.0)); // below the near distance
    tracker.observe(true, p(6.0)); // halfway between near and far
    let alphas = tracker.strip_alphas();
    assert!(approx(alphas[0], 0.5, 1e-6));
    assert!(approx(alphas[1], 0.0, 1e-6));
    let segments = tracker.trail_segments();
    assert_eq!(segments.len(), 1);
    assert!(approx(segments[0].from_alpha, 0.5, 1e-6));
    assert!(approx(segments[0].to_alpha, 0.0, 1e-6));
}

#[test]
fn short_trails_have_no_segments() {
    let mut tracker = JointTracker::new(joint());
    assert!(tracker.trail_segments().is_empty());
    tracker.observe(true, p(1.0));
    assert!(tracker.trail_segments().is_empty());
    tracker.observe(true, p(11.0));
    assert_eq!(tracker.strip_alphas().len(), 1);
    assert!(tracker.trail_segments().is_empty());
}

#[test]
fn one_tracker_per_joint_of_every_clip() {
    let clips = vec![two_bones_clip(), walking_clip(4, 1.0)];
    let trackers = trackers_for(&clips);
    assert_eq!(trackers.len(), 3 + 2);
    assert_eq!(trackers[3].joint(), JointRef { clip: 1, joint: 0 });
}

#[test]
fn update_samples_its_clip_only_on_new_frames() {
    let mut clips = vec![walking_clip(8, 10.0)];
    let mut tracker = JointTracker::new(JointRef { clip: 0, joint: 0 });

    clips[0].update();
    tracker.update(&clips);
    assert_eq!(tracker.points().len(), 1);

    // no frame change
    clips[0].update();
    tracker.update(&clips);
    assert_eq!(tracker.points().len(), 1);

    clips[0].set_frame(3);
    clips[0].update();
    tracker.update(&clips);
    assert_eq!(tracker.points().len(), 2);
    assert!(approx_vec(tracker.points()[0], p(30.0), 1e-5));
}

#[test]
fn tracker_for_a_missing_clip_stays_empty() {
    let clips = vec![walking_clip(2, 1.0)];
    let mut tracker = JointTracker::new(JointRef { clip: 5, joint: 0 });
    tracker.update(&clips);
    assert!(tracker.points().is_empty());
}

#[test]
fn history_never_exceeds_capacity_for_any_tick_sequence() {
    let mut tracker = JointTracker::new(joint());
    let mut seed = 0x2545_f491u32;
    for i in 0..500 {
        seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        let before: Vec<Vec3> = tracker.points().iter().copied().collect();
        let frame_new = seed >> 31 == 1;
        tracker.observe(frame_new, p(i as f32));
        assert!(tracker.points().len() <= TRAIL_CAPACITY);
        if !frame_new {
            assert_eq!(tracker.points().iter().copied().collect::<Vec<_>>(), before);
        } else {
            assert_eq!(tracker.points()[0], p(i as f32));
        }
    }
}
