// Host-side tests for BVH parsing.

mod common;

use common::*;
use dance_core::{parse_bvh, Channel, SketchError};
use glam::Vec3;

#[test]
fn parses_hierarchy_and_motion() {
    let bvh = parse_bvh(TWO_BONES).unwrap();

    // Hips, Chest and the End Site above the chest
    assert_eq!(bvh.joints.len(), 3);
    assert_eq!(bvh.channel_count, 9);
    assert_eq!(bvh.num_frames(), 2);
    assert!(approx(bvh.frame_time, 0.0333333, 1e-7));

    let hips = &bvh.joints[0];
    assert_eq!(hips.name, "Hips");
    assert_eq!(hips.parent, None);
    assert_eq!(hips.channels.len(), 6);
    assert_eq!(hips.channels[3], Channel::Zrotation);
    assert_eq!(hips.channel_start, 0);

    let chest = &bvh.joints[1];
    assert_eq!(chest.parent, Some(0));
    assert_eq!(chest.channel_start, 6);
    assert_eq!(chest.offset, Vec3::new(0.0, 10.0, 0.0));
    assert!(chest.channels.iter().all(|c| c.is_rotation()));

    let end = &bvh.joints[2];
    assert!(end.is_end_site);
    assert_eq!(end.name, "Chest_end");
    assert_eq!(end.parent, Some(1));
    assert!(end.channels.is_empty());
    assert_eq!(end.offset, Vec3::new(0.0, 5.0, 0.0));

    assert_eq!(bvh.frame(1)[0], 10.0);
    assert_eq!(bvh.frame(1)[6], 90.0);
}

#[test]
fn braces_may_share_lines_with_keywords() {
    let src = "HIERARCHY ROOT a { OFFSET 0 0 0 CHANNELS 1 Yposition }\nMOTION\nFrames: 3\nFrame Time: 0.5\n1\n2\n3\n";
    let bvh = parse_bvh(src).unwrap();
    assert_eq!(bvh.joints.len(), 1);
    assert_eq!(bvh.num_frames(), 3);
    assert_eq!(bvh.frame(2), [3.0f32].as_slice());
}

#[test]
fn unknown_channel_reports_its_line() {
    let src = TWO_BONES.replace("CHANNELS 3 Zrotation", "CHANNELS 3 Wrotation");
    match parse_bvh(&src) {
        Err(SketchError::BvhSyntax { line, .. }) => assert_eq!(line, 9),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn non_numeric_motion_value_is_a_syntax_error() {
    let src = TWO_BONES.replace("10 0 0 0 0 0 90 0 0", "10 0 0 0 x 0 90 0 0");
    match parse_bvh(&src) {
        Err(SketchError::BvhSyntax { line, .. }) => assert_eq!(line, 20),
        other => panic!("expected a syntax error, got {other:?}"),
    }
}

#[test]
fn ragged_motion_rows_are_rejected() {
    let src = format!("{}1\n", TWO_BONES);
    assert!(matches!(parse_bvh(&src), Err(SketchError::BvhStructure(_))));
}

#[test]
fn missing_motion_is_rejected() {
    let src = TWO_BONES.split("MOTION").next().unwrap().to_string();
    assert!(matches!(parse_bvh(&src), Err(SketchError::BvhSyntax { .. })));
}

#[test]
fn frame_count_mismatch_uses_the_rows_present() {
    let src = TWO_BONES.replace("Frames: 2", "Frames: 5");
    let bvh = parse_bvh(&src).unwrap();
    assert_eq!(bvh.num_frames(), 2);
}

#[test]
fn huge_declared_frame_count_does_not_allocate() {
    let src = TWO_BONES.replace("Frames: 2", "Frames: 18446744073709551615");
    let bvh = parse_bvh(&src).unwrap();
    assert_eq!(bvh.num_frames(), 2);

    let src = TWO_BONES.replace("Frames: 2", "Frames: 4000000000000");
    assert_eq!(parse_bvh(&src).unwrap().num_frames(), 2);
}

#[test]
fn frame_count_beyond_usize_is_a_syntax_error() {
    let src = TWO_BONES.replace("Frames: 2", "Frames: 99999999999999999999999");
    let err = parse_bvh(&src).unwrap_err();
    assert!(matches!(err, SketchError::BvhSyntax { line: 17, .. }));
}

#[test]
fn huge_channel_count_is_a_syntax_error() {
    let src = TWO_BONES.replace("CHANNELS 3 Zrotation", "CHANNELS 4000000000000 Zrotation");
    assert!(matches!(parse_bvh(&src), Err(SketchError::BvhSyntax { .. })));
}

#[test]
fn zero_frame_time_is_rejected() {
    let src = TWO_BONES.replace("Frame Time: 0.0333333", "Frame Time: 0");
    assert!(matches!(parse_bvh(&src), Err(SketchError::BvhStructure(_))));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = dance_core::load_bvh("does/not/exist.bvh").unwrap_err();
    assert!(matches!(err, SketchError::Io { .. }));
}
