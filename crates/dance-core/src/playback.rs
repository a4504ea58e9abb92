//! Scratch-style playback control.
//!
//! A key press flips the target speed to reverse, releasing it resumes
//! forward play. The applied speed follows the target through a one-pole
//! low-pass so the audio winds down and back up instead of jumping.

use crate::constants::{FORWARD_SPEED, REVERSE_SPEED, SPEED_SMOOTHING};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackDirection {
    Forward,
    Reverse,
}

impl PlaybackDirection {
    pub fn target_speed(self) -> f32 {
        match self {
            PlaybackDirection::Forward => FORWARD_SPEED,
            PlaybackDirection::Reverse => REVERSE_SPEED,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlaybackState {
    direction: PlaybackDirection,
    target: f32,
    current: f32,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            direction: PlaybackDirection::Forward,
            target: FORWARD_SPEED,
            current: FORWARD_SPEED,
        }
    }
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(&self) -> PlaybackDirection {
        self.direction
    }

    pub fn target_speed(&self) -> f32 {
        self.target
    }

    pub fn speed(&self) -> f32 {
        self.current
    }

    pub fn set_direction(&mut self, direction: PlaybackDirection) {
        self.direction = direction;
        self.target = direction.target_speed();
    }

    pub fn key_pressed(&mut self) {
        self.set_direction(PlaybackDirection::Reverse);
    }

    pub fn key_released(&mut self) {
        self.set_direction(PlaybackDirection::Forward);
    }

    /// Moves the applied speed towards the target and returns it.
    pub fn tick(&mut self) -> f32 {
        self.current += (self.target - self.current) * SPEED_SMOOTHING;
        self.current
    }
}

/// Normalized animation position for a normalized audio position.
///
/// The audio asset is `track_duration` seconds long; the result is the
/// matching fraction of an animation lasting `animation_duration` seconds.
#[inline]
pub fn scrub_position(audio_position: f32, track_duration: f32, animation_duration: f32) -> f32 {
    if animation_duration <= 0.0 {
        return 0.0;
    }
    audio_position * track_duration / animation_duration
}
