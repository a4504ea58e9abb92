//! Per-tick state of the whole piece.
//!
//! [`Sketch::update`] advances everything that does not need a GPU: speed
//! smoothing, audio-driven scrubbing, trails, the point cloud and the
//! surface. Renderers only read the results back.

use glam::Vec3;

use crate::camera::SketchCamera;
use crate::cloud::{gather_cloud, CloudTransform};
use crate::constants::{ROTATE_STEP_DEG, START_FRAME, TRACK_DURATION_SEC};
use crate::motion::MotionClip;
use crate::playback::{scrub_position, PlaybackState};
use crate::surface::{metaball_radii, Mesh, MetaballSurface, SurfaceGenerator};
use crate::tracker::{trackers_for, JointTracker, TrailSegment};
use crate::transport::AudioTransport;

pub struct Sketch<G: SurfaceGenerator = MetaballSurface> {
    clips: Vec<MotionClip>,
    trackers: Vec<JointTracker>,
    playback: PlaybackState,
    cloud_transform: CloudTransform,
    cloud: Vec<Vec3>,
    surface: G,
    radii: (f32, f32),
    scrub: f32,
    track_duration: f32,
    yaw_degrees: f32,
}

impl Sketch<MetaballSurface> {
    pub fn new(clips: Vec<MotionClip>) -> Self {
        Self::with_surface(clips, MetaballSurface::default())
    }
}

impl<G: SurfaceGenerator> Sketch<G> {
    pub fn with_surface(mut clips: Vec<MotionClip>, surface: G) -> Self {
        for clip in &mut clips {
            clip.set_frame(START_FRAME);
        }
        let trackers = trackers_for(&clips);
        log::info!(
            "sketch ready: {} clips, {} trackers",
            clips.len(),
            trackers.len()
        );
        Self {
            clips,
            trackers,
            playback: PlaybackState::new(),
            cloud_transform: CloudTransform::default(),
            cloud: Vec::new(),
            surface,
            radii: metaball_radii(0.0),
            scrub: 0.0,
            track_duration: TRACK_DURATION_SEC,
            yaw_degrees: 0.0,
        }
    }

    pub fn set_track_duration(&mut self, seconds: f32) {
        self.track_duration = seconds;
    }

    pub fn key_pressed(&mut self) {
        self.playback.key_pressed();
    }

    pub fn key_released(&mut self) {
        self.playback.key_released();
    }

    /// One frame tick. `elapsed` is wall-clock seconds since launch and only
    /// drives the radius pulse.
    pub fn update(&mut self, transport: &mut impl AudioTransport, elapsed: f32) {
        self.yaw_degrees += ROTATE_STEP_DEG;

        let speed = self.playback.tick();
        transport.set_speed(speed);

        let animation_duration = self.clips.first().map(MotionClip::duration).unwrap_or(0.0);
        self.scrub = scrub_position(transport.position(), self.track_duration, animation_duration);
        for clip in &mut self.clips {
            clip.set_position(self.scrub);
            clip.update();
        }

        for tracker in &mut self.trackers {
            tracker.update(&self.clips);
        }
        gather_cloud(&self.trackers, &self.cloud_transform, &mut self.cloud);

        self.radii = metaball_radii(elapsed);
        self.surface.set_centers(&self.cloud);
        self.surface.set_radius(self.radii.0, self.radii.1);
        self.surface.update();
    }

    pub fn clips(&self) -> &[MotionClip] {
        &self.clips
    }

    pub fn trackers(&self) -> &[JointTracker] {
        &self.trackers
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.playback
    }

    pub fn cloud(&self) -> &[Vec3] {
        &self.cloud
    }

    pub fn cloud_transform(&self) -> &CloudTransform {
        &self.cloud_transform
    }

    /// Normalized animation position applied on the last update.
    pub fn scrub(&self) -> f32 {
        self.scrub
    }

    pub fn radii(&self) -> (f32, f32) {
        self.radii
    }

    pub fn mesh(&self) -> &Mesh {
        self.surface.mesh()
    }

    pub fn camera(&self, width: f32, height: f32) -> SketchCamera {
        SketchCamera::new(width, height, self.yaw_degrees)
    }

    pub fn trail_segments(&self) -> Vec<TrailSegment> {
        self.trackers
            .iter()
            .flat_map(|t| t.trail_segments())
            .collect()
    }

    pub fn bones(&self) -> Vec<(Vec3, Vec3)> {
        self.clips.iter().flat_map(|c| c.bones()).collect()
    }
}
