mod audio;
mod render;

use std::time::Instant;

use anyhow::Context;
use dance_core::{load_clips, AudioClip, FillImage, Sketch, SketchConfig};
use winit::{
    dpi::PhysicalSize,
    event::*,
    event_loop::EventLoop,
    window::WindowBuilder,
};

use crate::render::GpuState;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config = SketchConfig::from_env();
    log::info!("assets from {}", config.asset_root.display());

    let clips = load_clips(&config).context("loading motion files")?;
    let sound_path = config.sound_path();
    let sound = AudioClip::load_wav(&sound_path)
        .with_context(|| format!("loading {}", sound_path.display()))?;
    let fill_path = config.fill_image_path();
    let fill_image =
        FillImage::load(&fill_path).with_context(|| format!("loading {}", fill_path.display()))?;

    let mut sketch = Sketch::new(clips);
    sketch.set_track_duration(config.track_duration);

    // Playback starts as soon as the stream exists.
    let audio = audio::start_audio(sound);
    let mut transport = audio.transport.clone();

    let event_loop = EventLoop::new()?;
    let (width, height) = config.target_size;
    let window = WindowBuilder::new()
        .with_title("melt-dance")
        .with_inner_size(PhysicalSize::new(width, height))
        .build(&event_loop)?;

    let mut state = pollster::block_on(GpuState::new(&window, &config, &fill_image))
        .context("initialising GPU")?;
    let start = Instant::now();
    let mut last_frame = start;

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent {
            event: WindowEvent::Resized(size),
            ..
        } => state.resize(size),
        Event::WindowEvent {
            event: WindowEvent::CloseRequested,
            ..
        } => elwt.exit(),
        Event::WindowEvent {
            event: WindowEvent::KeyboardInput { event, .. },
            ..
        } => match event.state {
            ElementState::Pressed if !event.repeat => sketch.key_pressed(),
            ElementState::Released => sketch.key_released(),
            _ => {}
        },
        Event::AboutToWait => {
            let now = Instant::now();
            if !audio.is_playing() {
                transport.advance_silent((now - last_frame).as_secs_f32());
            }
            last_frame = now;
            sketch.update(&mut transport, (now - start).as_secs_f32());

            match state.render(&sketch) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("surface out of memory");
                    elwt.exit()
                }
                Err(e) => log::warn!("surface error: {e:?}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
