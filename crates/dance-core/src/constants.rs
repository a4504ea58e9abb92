use glam::Vec3;

// Tuning constants shared by the sketch logic and the native frontend.

// Surface space
pub const SURFACE_SCALE: f32 = 512.0; // mocap units per unit-cube edge
pub const Y_OFFSET: f32 = 0.5; // lifts the dancers inside the unit cube
pub const Y_SCALE: f32 = 1.0; // vertical aspect correction

// Media
pub const TRACK_DURATION_SEC: f32 = 64.28; // length of the sound asset
pub const START_FRAME: usize = 1; // every clip is parked here before playback

// Trails
pub const TRAIL_CAPACITY: usize = 4; // recorded positions per joint
pub const TRAIL_FADE_NEAR: f32 = 3.0; // segment length mapped to alpha 0
pub const TRAIL_FADE_FAR: f32 = 5.0; // segment length mapped to alpha 1
pub const TRAIL_OVERLAY_ALPHA: f32 = 80.0 / 255.0;

// Playback
pub const SPEED_SMOOTHING: f32 = 0.3; // fraction of the gap closed per tick
pub const FORWARD_SPEED: f32 = 1.0;
pub const REVERSE_SPEED: f32 = -1.0;

// Metaball radii
pub const TEMPO: f32 = 63.935 / 60.0; // beats per second of the track
pub const MIN_RADIUS_RANGE: [f32; 2] = [0.001, 0.06];
pub const EXTRA_RADIUS_RANGE: [f32; 2] = [0.001, 0.04];
pub const SURFACE_RESOLUTION: usize = 32; // grid cells per axis
pub const ISO_LEVEL: f32 = 0.5;

// Camera
pub const ROTATE_STEP_DEG: f32 = 0.2; // yaw advance per tick
pub const CAMERA_PITCH_DEG: f32 = 20.0;
pub const CAMERA_LIFT_PX: f32 = 150.0;
pub const CAMERA_ZOOM: f32 = 1.8;
pub const ORTHO_DEPTH: f32 = 1000.0;
pub const LIGHT_POSITION: [f32; 3] = [1024.0, 1024.0, 1024.0];

// Off-screen target
pub const TARGET_WIDTH: u32 = 1280;
pub const TARGET_HEIGHT: u32 = 720;

#[inline]
pub fn cloud_offset_vec3() -> Vec3 {
    Vec3::new(0.5, 0.5 - Y_OFFSET, 0.5)
}
