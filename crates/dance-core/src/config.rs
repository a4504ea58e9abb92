use std::path::{Path, PathBuf};

use crate::composite::FillParams;
use crate::constants::{TARGET_HEIGHT, TARGET_WIDTH, TRACK_DURATION_SEC};

/// Environment variable that relocates the asset directory.
pub const ASSET_ROOT_ENV: &str = "MELT_DANCE_ASSETS";
/// Comma-separated overlays to enable: `trails`, `skeletons`.
pub const OVERLAYS_ENV: &str = "MELT_DANCE_OVERLAYS";

/// Asset locations and presentation switches for one run of the sketch.
#[derive(Clone, Debug)]
pub struct SketchConfig {
    pub asset_root: PathBuf,
    pub motion_files: Vec<PathBuf>,
    pub sound_file: PathBuf,
    pub fill_image: PathBuf,
    pub track_duration: f32,
    pub target_size: (u32, u32),
    pub draw_trails: bool,
    pub draw_skeletons: bool,
    pub fill: FillParams,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("data"),
            motion_files: vec![
                PathBuf::from("bvhfiles/aachan.bvh"),
                PathBuf::from("bvhfiles/kashiyuka.bvh"),
                PathBuf::from("bvhfiles/nocchi.bvh"),
            ],
            sound_file: PathBuf::from("Perfume_globalsite_sound.wav"),
            fill_image: PathBuf::from("infinite-fills.png"),
            track_duration: TRACK_DURATION_SEC,
            target_size: (TARGET_WIDTH, TARGET_HEIGHT),
            draw_trails: false,
            draw_skeletons: false,
            fill: FillParams::default(),
        }
    }
}

impl SketchConfig {
    /// Defaults with the asset root and overlays taken from
    /// [`ASSET_ROOT_ENV`] and [`OVERLAYS_ENV`] when set.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(root) = std::env::var_os(ASSET_ROOT_ENV) {
            config.asset_root = PathBuf::from(root);
        }
        if let Ok(list) = std::env::var(OVERLAYS_ENV) {
            config.apply_overlays(&list);
        }
        config
    }

    /// Enables the overlays named in a comma-separated list. Unknown names
    /// are logged and ignored.
    pub fn apply_overlays(&mut self, list: &str) {
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.to_ascii_lowercase().as_str() {
                "trails" => self.draw_trails = true,
                "skeletons" | "skeleton" => self.draw_skeletons = true,
                other => log::warn!("unknown overlay {other:?}"),
            }
        }
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.asset_root.join(relative)
    }

    pub fn motion_paths(&self) -> impl Iterator<Item = PathBuf> + '_ {
        self.motion_files.iter().map(|p| self.resolve(p))
    }

    pub fn sound_path(&self) -> PathBuf {
        self.resolve(&self.sound_file)
    }

    pub fn fill_image_path(&self) -> PathBuf {
        self.resolve(&self.fill_image)
    }
}
