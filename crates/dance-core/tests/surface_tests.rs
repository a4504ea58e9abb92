// Host-side tests for the metaball surface.

mod common;

use common::*;
use dance_core::{
    falloff, metaball_radii, MetaballSurface, SurfaceGenerator, EXTRA_RADIUS_RANGE,
    MIN_RADIUS_RANGE,
};
use glam::Vec3;

#[test]
fn falloff_is_full_inside_and_zero_outside() {
    assert_eq!(falloff(0.05, 0.1, 0.2), 1.0);
    assert_eq!(falloff(0.1, 0.1, 0.2), 1.0);
    assert_eq!(falloff(0.2, 0.1, 0.2), 0.0);
    assert_eq!(falloff(0.3, 0.1, 0.2), 0.0);
    assert!(approx(falloff(0.15, 0.1, 0.2), 0.5, 1e-6));
}

#[test]
fn falloff_decreases_with_distance() {
    let mut last = 1.0;
    for i in 0..=100 {
        let f = falloff(i as f32 * 0.003, 0.1, 0.2);
        assert!(f <= last);
        last = f;
    }
}

#[test]
fn radii_stay_within_their_ranges() {
    for i in 0..2000 {
        let (min, max) = metaball_radii(i as f32 * 0.017);
        assert!(min >= MIN_RADIUS_RANGE[0] - 1e-6 && min <= MIN_RADIUS_RANGE[1] + 1e-6);
        let extra = max - min;
        assert!(extra >= EXTRA_RADIUS_RANGE[0] - 1e-6 && extra <= EXTRA_RADIUS_RANGE[1] + 1e-6);
        assert!(max > min);
    }
}

#[test]
fn radii_at_launch() {
    // sin(0) sits mid-range, cos(0) at the top of the extra range
    let (min, max) = metaball_radii(0.0);
    assert!(approx(min, 0.0305, 1e-6));
    assert!(approx(max, 0.0705, 1e-6));
}

#[test]
fn no_centers_no_mesh() {
    let mut surface = MetaballSurface::new(16);
    surface.set_centers(&[]);
    surface.update();
    assert!(surface.mesh().is_empty());
    assert_eq!(surface.mesh().triangle_count(), 0);
}

#[test]
fn single_center_gives_a_closed_blob_with_outward_normals() {
    let center = Vec3::splat(0.5);
    let mut surface = MetaballSurface::default();
    assert_eq!(surface.resolution(), 32);
    surface.set_centers(&[center]);
    surface.set_radius(0.1, 0.2);
    surface.update();

    let mesh = surface.mesh();
    assert!(!mesh.is_empty());
    assert_eq!(mesh.vertices.len() % 3, 0);
    assert_eq!(mesh.triangle_count(), mesh.vertices.len() / 3);

    // The iso level is crossed halfway between the radii
    let cell = 1.0 / 32.0;
    let mut outward = 0;
    for v in &mesh.vertices {
        let p = Vec3::from(v.position);
        let n = Vec3::from(v.normal);
        assert!(approx(p.distance(center), 0.15, cell));
        assert!(approx(n.length(), 1.0, 1e-3));
        if n.dot(p - center) > 0.0 {
            outward += 1;
        }
    }
    assert!(outward * 100 >= mesh.vertices.len() * 95);
}

#[test]
fn triangles_wind_counter_clockwise_seen_from_outside() {
    let center = Vec3::splat(0.5);
    let mut surface = MetaballSurface::new(24);
    surface.set_centers(&[center]);
    surface.set_radius(0.1, 0.2);
    surface.update();

    let verts = &surface.mesh().vertices;
    let mut facing_out = 0;
    let tris = verts.len() / 3;
    for t in verts.chunks_exact(3) {
        let (a, b, c) = (
            Vec3::from(t[0].position),
            Vec3::from(t[1].position),
            Vec3::from(t[2].position),
        );
        let face = (b - a).cross(c - a);
        let mid = (a + b + c) / 3.0;
        if face.dot(mid - center) > 0.0 {
            facing_out += 1;
        }
    }
    assert!(facing_out * 100 >= tris * 95);
}

#[test]
fn field_sums_overlapping_centers() {
    let mut surface = MetaballSurface::new(8);
    surface.set_centers(&[Vec3::splat(0.5), Vec3::splat(0.5)]);
    surface.set_radius(0.1, 0.2);
    surface.update();
    assert!(approx(surface.field_at(Vec3::splat(0.5)), 2.0, 1e-6));
    // grid sample (4, 4, 4) sits exactly on the centers
    assert!(approx(surface.sample(4, 4, 4), 2.0, 1e-6));
    assert_eq!(surface.sample(0, 0, 0), 0.0);
}

#[test]
fn radius_is_kept_ordered() {
    let mut surface = MetaballSurface::new(8);
    surface.set_radius(0.2, 0.1);
    assert_eq!(surface.radius(), (0.2, 0.2));
    surface.set_radius(-1.0, 0.05);
    assert_eq!(surface.radius(), (0.0, 0.05));
}

#[test]
fn far_and_invalid_centers_are_ignored() {
    let mut surface = MetaballSurface::new(16);
    surface.set_centers(&[Vec3::splat(5.0), Vec3::new(f32::NAN, 0.5, 0.5)]);
    surface.set_radius(0.05, 0.1);
    surface.update();
    assert!(surface.mesh().is_empty());
}

#[test]
fn regenerating_replaces_the_previous_mesh() {
    let mut surface = MetaballSurface::new(16);
    surface.set_centers(&[Vec3::splat(0.5)]);
    surface.set_radius(0.1, 0.2);
    surface.update();
    assert!(!surface.mesh().is_empty());

    surface.set_centers(&[]);
    surface.update();
    assert!(surface.mesh().is_empty());
}
