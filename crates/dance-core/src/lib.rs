pub mod assets;
pub mod bvh;
pub mod camera;
pub mod cloud;
pub mod composite;
pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod motion;
pub mod playback;
pub mod sketch;
pub mod surface;
pub mod tracker;
pub mod transport;

pub static MESH_WGSL: &str = include_str!("../shaders/mesh.wgsl");
pub static LINES_WGSL: &str = include_str!("../shaders/lines.wgsl");
pub static FILL_WGSL: &str = include_str!("../shaders/fill.wgsl");

pub use assets::*;
pub use bvh::{load_bvh, parse_bvh, Bvh, BvhJoint, Channel};
pub use camera::*;
pub use cloud::*;
pub use composite::*;
pub use config::*;
pub use constants::*;
pub use error::{Result, SketchError};
pub use motion::*;
pub use playback::*;
pub use sketch::*;
pub use surface::*;
pub use tracker::*;
pub use transport::*;
