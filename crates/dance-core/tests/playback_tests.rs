// Host-side tests for speed smoothing and scrub mapping.

mod common;

use common::*;
use dance_core::{scrub_position, PlaybackDirection, PlaybackState};

#[test]
fn starts_forward_at_full_speed() {
    let state = PlaybackState::new();
    assert_eq!(state.direction(), PlaybackDirection::Forward);
    assert_eq!(state.speed(), 1.0);
    assert_eq!(state.target_speed(), 1.0);
}

#[test]
fn key_press_eases_into_reverse() {
    let mut state = PlaybackState::new();
    state.key_pressed();
    assert_eq!(state.direction(), PlaybackDirection::Reverse);
    assert_eq!(state.target_speed(), -1.0);

    // 1 + (-1 - 1) * 0.3 = 0.4, then 0.4 + (-1 - 0.4) * 0.3 = -0.02
    assert!(approx(state.tick(), 0.4, 1e-6));
    assert!(approx(state.tick(), -0.02, 1e-6));
}

#[test]
fn speed_converges_monotonically() {
    let mut state = PlaybackState::new();
    state.key_pressed();
    let mut last = state.speed();
    for _ in 0..60 {
        let s = state.tick();
        assert!(s <= last);
        assert!(s >= -1.0);
        last = s;
    }
    assert!(approx(last, -1.0, 1e-4));
}

#[test]
fn key_release_returns_forward() {
    let mut state = PlaybackState::new();
    state.key_pressed();
    for _ in 0..30 {
        state.tick();
    }
    state.key_released();
    assert_eq!(state.direction(), PlaybackDirection::Forward);
    let mut last = state.speed();
    for _ in 0..60 {
        let s = state.tick();
        assert!(s >= last);
        last = s;
    }
    assert!(approx(last, 1.0, 1e-4));
}

#[test]
fn scrub_scales_audio_position_by_duration_ratio() {
    // Track twice as long as the animation: the animation runs out halfway
    assert!(approx(scrub_position(0.25, 64.0, 32.0), 0.5, 1e-6));
    assert!(approx(scrub_position(0.5, 64.0, 32.0), 1.0, 1e-6));
    assert!(approx(scrub_position(0.5, 64.28, 64.28), 0.5, 1e-6));
}

#[test]
fn scrub_with_empty_animation_is_zero() {
    assert_eq!(scrub_position(0.7, 64.28, 0.0), 0.0);
}
