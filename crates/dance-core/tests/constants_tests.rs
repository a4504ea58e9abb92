// Host-side tests for constants and the small math helpers.

mod common;

use common::*;
use dance_core::math::{map_range, smoothstep};
use dance_core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(SURFACE_SCALE > 0.0);
    assert!(Y_SCALE > 0.0);
    assert!(TRACK_DURATION_SEC > 0.0);
    assert!(TRAIL_CAPACITY >= 2);
    assert!(TRAIL_FADE_NEAR < TRAIL_FADE_FAR);

    // Smoothing must move towards the target without overshooting
    assert!(SPEED_SMOOTHING > 0.0 && SPEED_SMOOTHING <= 1.0);

    assert!(ISO_LEVEL > 0.0 && ISO_LEVEL < 1.0);
    assert!(MIN_RADIUS_RANGE[0] > 0.0 && MIN_RADIUS_RANGE[0] < MIN_RADIUS_RANGE[1]);
    assert!(EXTRA_RADIUS_RANGE[0] > 0.0 && EXTRA_RADIUS_RANGE[0] < EXTRA_RADIUS_RANGE[1]);
}

#[test]
fn cloud_offset_centres_x_and_z() {
    let o = cloud_offset_vec3();
    assert_eq!(o.x, 0.5);
    assert_eq!(o.z, 0.5);
    assert!(approx(o.y, 0.5 - Y_OFFSET, 1e-6));
}

#[test]
fn map_range_basics() {
    assert!(approx(map_range(5.0, 0.0, 10.0, 0.0, 1.0, false), 0.5, 1e-6));
    assert!(approx(map_range(15.0, 0.0, 10.0, 0.0, 1.0, false), 1.5, 1e-6));
    assert!(approx(map_range(15.0, 0.0, 10.0, 0.0, 1.0, true), 1.0, 1e-6));
}

#[test]
fn map_range_clamps_reversed_outputs() {
    assert!(approx(map_range(-1.0, 0.0, 3.0, 1.0, 0.0, true), 1.0, 1e-6));
    assert!(approx(map_range(4.0, 0.0, 3.0, 1.0, 0.0, true), 0.0, 1e-6));
    assert!(approx(map_range(1.0, 0.0, 3.0, 1.0, 0.0, true), 2.0 / 3.0, 1e-6));
}

#[test]
fn map_range_with_empty_input_range_returns_out_min() {
    assert_eq!(map_range(3.0, 2.0, 2.0, 7.0, 9.0, true), 7.0);
}

#[test]
fn smoothstep_endpoints_and_midpoint() {
    assert_eq!(smoothstep(-1.0), 0.0);
    assert_eq!(smoothstep(0.0), 0.0);
    assert_eq!(smoothstep(1.0), 1.0);
    assert_eq!(smoothstep(2.0), 1.0);
    assert!(approx(smoothstep(0.5), 0.5, 1e-6));
}
