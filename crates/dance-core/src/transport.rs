//! Looping, speed-controllable playback of a decoded sound file.
//!
//! [`TransportCursor`] is pure sample arithmetic so it can be driven by a
//! device callback and by tests alike. Speed may be negative; the cursor then
//! runs backwards and wraps through the loop point.

use std::path::Path;

use crate::{Result, SketchError};

/// What the sketch needs from whatever is playing the sound.
pub trait AudioTransport {
    /// Playback position as a fraction of the track, in `[0, 1)`.
    fn position(&self) -> f32;
    fn set_speed(&mut self, speed: f32);
}

/// Interleaved f32 samples of a whole sound file.
#[derive(Clone, Debug)]
pub struct AudioClip {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioClip {
    pub fn from_samples(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 || sample_rate == 0 {
            return Err(SketchError::msg("audio clip needs at least one channel and a sample rate"));
        }
        Ok(Self {
            samples,
            channels,
            sample_rate,
        })
    }

    pub fn load_wav(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let samples = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<Vec<_>, _>>()?,
            hound::SampleFormat::Int => {
                let full_scale = (1u64 << (spec.bits_per_sample.max(1) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / full_scale))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        let clip = Self::from_samples(samples, spec.channels, spec.sample_rate)?;
        log::info!(
            "loaded {}: {} ch, {} Hz, {:.2}s",
            path.display(),
            clip.channels,
            clip.sample_rate,
            clip.duration_secs()
        );
        Ok(clip)
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f32 {
        self.frames() as f32 / self.sample_rate as f32
    }

    #[inline]
    fn sample(&self, frame: usize, channel: usize) -> f32 {
        let ch = channel.min(self.channels as usize - 1);
        self.samples[frame * self.channels as usize + ch]
    }
}

#[derive(Clone, Debug)]
pub struct TransportCursor {
    clip: AudioClip,
    cursor: f64,
    speed: f32,
    rate_ratio: f64,
    looping: bool,
}

impl TransportCursor {
    pub fn new(clip: AudioClip) -> Self {
        Self {
            clip,
            cursor: 0.0,
            speed: 1.0,
            rate_ratio: 1.0,
            looping: true,
        }
    }

    pub fn clip(&self) -> &AudioClip {
        &self.clip
    }

    /// Adapts the step size to a device running at `sample_rate`.
    pub fn set_output_rate(&mut self, sample_rate: u32) {
        if sample_rate > 0 {
            self.rate_ratio = self.clip.sample_rate as f64 / sample_rate as f64;
        }
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_loop(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn set_position(&mut self, position: f32) {
        let frames = self.clip.frames() as f64;
        self.cursor = (position as f64 * frames).clamp(0.0, (frames - 1.0).max(0.0));
    }

    /// Produces one output frame and advances the cursor.
    pub fn next_stereo(&mut self) -> (f32, f32) {
        let frames = self.clip.frames();
        if frames == 0 {
            return (0.0, 0.0);
        }
        let base = self.cursor.floor();
        let frac = (self.cursor - base) as f32;
        let i0 = (base as usize).min(frames - 1);
        let i1 = if i0 + 1 < frames {
            i0 + 1
        } else if self.looping {
            0
        } else {
            i0
        };
        let lerp = |ch: usize| {
            let a = self.clip.sample(i0, ch);
            let b = self.clip.sample(i1, ch);
            a + (b - a) * frac
        };
        let out = (lerp(0), lerp(1));

        let next = self.cursor + self.speed as f64 * self.rate_ratio;
        let len = frames as f64;
        self.cursor = if self.looping {
            let wrapped = next.rem_euclid(len);
            if wrapped >= len {
                0.0
            } else {
                wrapped
            }
        } else {
            next.clamp(0.0, len - 1.0)
        };
        out
    }

    /// Moves the cursor as if `seconds` of output had been played, without
    /// producing samples. Used when no output device is available.
    pub fn advance_secs(&mut self, seconds: f32) {
        let frames = self.clip.frames();
        if frames == 0 {
            return;
        }
        let len = frames as f64;
        let next = self.cursor + seconds as f64 * self.speed as f64 * self.clip.sample_rate as f64;
        self.cursor = if self.looping {
            next.rem_euclid(len).min(len - 1.0)
        } else {
            next.clamp(0.0, len - 1.0)
        };
    }

    /// Fills an interleaved buffer of `channels` channels.
    pub fn render(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let (l, r) = self.next_stereo();
            if channels >= 2 {
                frame[0] = l;
                if frame.len() > 1 {
                    frame[1] = r;
                }
                for s in frame.iter_mut().skip(2) {
                    *s = 0.0;
                }
            } else {
                frame[0] = 0.5 * (l + r);
            }
        }
    }
}

impl AudioTransport for TransportCursor {
    fn position(&self) -> f32 {
        let frames = self.clip.frames();
        if frames == 0 {
            return 0.0;
        }
        ((self.cursor / frames as f64) as f32).min(1.0 - f32::EPSILON)
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }
}
