use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use dance_core::{AudioClip, AudioTransport, TransportCursor};

/// Frame-thread handle onto the cursor the audio callback plays from.
#[derive(Clone)]
pub struct SharedTransport {
    cursor: Arc<Mutex<TransportCursor>>,
}

impl SharedTransport {
    /// Advances the cursor by wall-clock time when no device is pulling
    /// samples.
    pub fn advance_silent(&self, seconds: f32) {
        if let Ok(mut cursor) = self.cursor.lock() {
            cursor.advance_secs(seconds);
        }
    }
}

impl AudioTransport for SharedTransport {
    fn position(&self) -> f32 {
        self.cursor.lock().map(|c| c.position()).unwrap_or(0.0)
    }

    fn set_speed(&mut self, speed: f32) {
        if let Ok(mut cursor) = self.cursor.lock() {
            cursor.set_speed(speed);
        }
    }
}

pub struct AudioOutput {
    pub transport: SharedTransport,
    // Dropping the stream stops playback.
    stream: Option<cpal::Stream>,
}

impl AudioOutput {
    pub fn is_playing(&self) -> bool {
        self.stream.is_some()
    }
}

/// Starts looping `clip` on the default output device. Without a usable
/// device the transport is still returned and must be advanced by hand.
pub fn start_audio(clip: AudioClip) -> AudioOutput {
    let mut cursor = TransportCursor::new(clip);
    cursor.set_loop(true);
    let cursor = Arc::new(Mutex::new(cursor));
    let transport = SharedTransport {
        cursor: Arc::clone(&cursor),
    };
    let stream = open_stream(cursor);
    if stream.is_none() {
        log::warn!("no audio output available, playing silently");
    }
    AudioOutput { transport, stream }
}

fn open_stream(cursor: Arc<Mutex<TransportCursor>>) -> Option<cpal::Stream> {
    let host = cpal::default_host();
    let device = host.default_output_device()?;
    let config = device.default_output_config().ok()?;
    let channels = config.channels() as usize;
    if let Ok(mut c) = cursor.lock() {
        c.set_output_rate(config.sample_rate().0);
    }
    log::info!(
        "audio output: {} ({} ch, {} Hz, {:?})",
        device.name().unwrap_or_else(|_| "unknown".into()),
        channels,
        config.sample_rate().0,
        config.sample_format()
    );

    let err_fn = |err: cpal::StreamError| log::error!("audio stream error: {err}");

    let stream = match config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &config.into(), channels, cursor, err_fn).ok()?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &config.into(), channels, cursor, err_fn).ok()?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(&device, &config.into(), channels, cursor, err_fn).ok()?
        }
        other => {
            log::warn!("unsupported sample format {other:?}");
            return None;
        }
    };

    stream.play().ok()?;
    Some(stream)
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    cursor: Arc<Mutex<TransportCursor>>,
    err_fn: impl Fn(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut scratch: Vec<f32> = Vec::new();
    device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let Ok(mut cursor) = cursor.lock() else {
                data.fill(T::EQUILIBRIUM);
                return;
            };
            scratch.resize(data.len(), 0.0);
            cursor.render(&mut scratch, channels);
            for (out, &s) in data.iter_mut().zip(scratch.iter()) {
                *out = T::from_sample(s);
            }
        },
        err_fn,
        None,
    )
}
