use std::path::Path;

use crate::config::SketchConfig;
use crate::motion::MotionClip;
use crate::{Result, SketchError};

/// RGBA8 pixels of the palette image sampled by the fill shader.
#[derive(Clone, Debug)]
pub struct FillImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl FillImage {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path)?.to_rgba8();
        let (width, height) = image.dimensions();
        log::info!("loaded {}: {width}x{height}", path.display());
        Ok(Self {
            width,
            height,
            rgba: image.into_raw(),
        })
    }
}

/// Loads every configured clip, in configuration order.
pub fn load_clips(config: &SketchConfig) -> Result<Vec<MotionClip>> {
    let clips = config
        .motion_paths()
        .map(MotionClip::load)
        .collect::<Result<Vec<_>>>()?;
    if clips.is_empty() {
        return Err(SketchError::msg("no motion files configured"));
    }
    Ok(clips)
}
