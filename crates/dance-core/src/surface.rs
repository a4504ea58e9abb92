//! Metaball isosurface over the unit cube.
//!
//! Every center splats a radial falloff into a regular grid of field
//! samples: full strength inside the min radius, nothing past the max radius
//! and a smoothstep in between. The grid is then polygonised at
//! [`ISO_LEVEL`] with marching tetrahedra (six per cell, sharing the main
//! diagonal), which needs no lookup tables and never produces ambiguous
//! faces.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::constants::{
    EXTRA_RADIUS_RANGE, ISO_LEVEL, MIN_RADIUS_RANGE, SURFACE_RESOLUTION, TEMPO,
};
use crate::math::{map_range, smoothstep};

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Non-indexed triangle list in unit-cube space.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Contract of anything that turns a point cloud into a blobby mesh.
pub trait SurfaceGenerator {
    fn set_centers(&mut self, centers: &[Vec3]);
    fn set_radius(&mut self, min: f32, max: f32);
    fn update(&mut self);
    fn mesh(&self) -> &Mesh;
}

/// Influence radii pulsing with the track tempo at `elapsed` seconds.
///
/// Returns `(min, max)` where `max` is always above `min`.
pub fn metaball_radii(elapsed: f32) -> (f32, f32) {
    let phase = TEMPO * FRAC_PI_2 * elapsed;
    let min = map_range(phase.sin(), -1.0, 1.0, MIN_RADIUS_RANGE[0], MIN_RADIUS_RANGE[1], false);
    let extra = map_range(
        phase.cos(),
        -1.0,
        1.0,
        EXTRA_RADIUS_RANGE[0],
        EXTRA_RADIUS_RANGE[1],
        false,
    );
    (min, min + extra)
}

// Cube corner `c` sits at (c & 1, (c >> 1) & 1, (c >> 2) & 1).
const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 3, 2, 7],
    [0, 2, 6, 7],
    [0, 6, 4, 7],
    [0, 4, 5, 7],
    [0, 5, 1, 7],
];

#[derive(Debug)]
pub struct MetaballSurface {
    resolution: usize,
    centers: Vec<Vec3>,
    min_radius: f32,
    max_radius: f32,
    field: Vec<f32>,
    mesh: Mesh,
}

impl Default for MetaballSurface {
    fn default() -> Self {
        Self::new(SURFACE_RESOLUTION)
    }
}

impl MetaballSurface {
    pub fn new(resolution: usize) -> Self {
        let resolution = resolution.max(1);
        let samples = resolution + 1;
        Self {
            resolution,
            centers: Vec::new(),
            min_radius: MIN_RADIUS_RANGE[0],
            max_radius: MIN_RADIUS_RANGE[0] + EXTRA_RADIUS_RANGE[0],
            field: vec![0.0; samples * samples * samples],
            mesh: Mesh::default(),
        }
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn radius(&self) -> (f32, f32) {
        (self.min_radius, self.max_radius)
    }

    /// Field value at grid sample `(x, y, z)`.
    pub fn sample(&self, x: usize, y: usize, z: usize) -> f32 {
        self.field[self.index(x, y, z)]
    }

    /// Field value at an arbitrary point, summed over all centers.
    pub fn field_at(&self, p: Vec3) -> f32 {
        self.centers
            .iter()
            .map(|c| falloff(p.distance(*c), self.min_radius, self.max_radius))
            .sum()
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let s = self.resolution + 1;
        (z * s + y) * s + x
    }

    #[inline]
    fn grid_point(&self, x: usize, y: usize, z: usize) -> Vec3 {
        Vec3::new(x as f32, y as f32, z as f32) / self.resolution as f32
    }

    fn splat(&mut self) {
        self.field.iter_mut().for_each(|v| *v = 0.0);
        let res = self.resolution as f32;
        let reach = self.max_radius.max(self.min_radius);
        let last = self.resolution as i64;
        let bounds = |v: f32| -> (usize, usize) {
            let lo = ((v - reach) * res).floor() as i64;
            let hi = ((v + reach) * res).ceil() as i64;
            (lo.clamp(0, last) as usize, hi.clamp(0, last) as usize)
        };
        for ci in 0..self.centers.len() {
            let c = self.centers[ci];
            if !c.is_finite() {
                continue;
            }
            let (x0, x1) = bounds(c.x);
            let (y0, y1) = bounds(c.y);
            let (z0, z1) = bounds(c.z);
            for z in z0..=z1 {
                for y in y0..=y1 {
                    for x in x0..=x1 {
                        let d = self.grid_point(x, y, z).distance(c);
                        let f = falloff(d, self.min_radius, self.max_radius);
                        if f > 0.0 {
                            let i = self.index(x, y, z);
                            self.field[i] += f;
                        }
                    }
                }
            }
        }
    }

    fn gradient(&self, x: usize, y: usize, z: usize) -> Vec3 {
        let r = self.resolution;
        let axis = |lo: f32, hi: f32, span: usize| (hi - lo) / span as f32;
        let (xl, xh) = (x.saturating_sub(1), (x + 1).min(r));
        let (yl, yh) = (y.saturating_sub(1), (y + 1).min(r));
        let (zl, zh) = (z.saturating_sub(1), (z + 1).min(r));
        Vec3::new(
            axis(self.sample(xl, y, z), self.sample(xh, y, z), xh - xl),
            axis(self.sample(x, yl, z), self.sample(x, yh, z), yh - yl),
            axis(self.sample(x, y, zl), self.sample(x, y, zh), zh - zl),
        )
    }

    fn polygonise(&mut self) {
        let mut vertices = std::mem::take(&mut self.mesh.vertices);
        vertices.clear();
        let r = self.resolution;
        let mut corners = [Corner::default(); 8];
        for z in 0..r {
            for y in 0..r {
                for x in 0..r {
                    let mut inside = 0;
                    for (c, corner) in corners.iter_mut().enumerate() {
                        let (cx, cy, cz) = (x + (c & 1), y + ((c >> 1) & 1), z + ((c >> 2) & 1));
                        corner.value = self.sample(cx, cy, cz);
                        corner.grid = (cx, cy, cz);
                        if corner.value >= ISO_LEVEL {
                            inside += 1;
                        }
                    }
                    if inside == 0 || inside == 8 {
                        continue;
                    }
                    for corner in corners.iter_mut() {
                        let (cx, cy, cz) = corner.grid;
                        corner.position = self.grid_point(cx, cy, cz);
                        corner.normal = -self.gradient(cx, cy, cz);
                    }
                    for tet in &TETRAHEDRA {
                        emit_tetrahedron(
                            [corners[tet[0]], corners[tet[1]], corners[tet[2]], corners[tet[3]]],
                            &mut vertices,
                        );
                    }
                }
            }
        }
        self.mesh.vertices = vertices;
    }
}

impl SurfaceGenerator for MetaballSurface {
    fn set_centers(&mut self, centers: &[Vec3]) {
        self.centers.clear();
        self.centers.extend_from_slice(centers);
    }

    fn set_radius(&mut self, min: f32, max: f32) {
        self.min_radius = min.max(0.0);
        self.max_radius = max.max(self.min_radius);
    }

    fn update(&mut self) {
        self.splat();
        self.polygonise();
    }

    fn mesh(&self) -> &Mesh {
        &self.mesh
    }
}

/// 1 inside `min`, 0 beyond `max`, smooth in between.
#[inline]
pub fn falloff(distance: f32, min: f32, max: f32) -> f32 {
    if distance <= min {
        1.0
    } else if distance >= max {
        0.0
    } else {
        smoothstep((max - distance) / (max - min))
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Corner {
    grid: (usize, usize, usize),
    value: f32,
    position: Vec3,
    normal: Vec3,
}

fn emit_tetrahedron(tet: [Corner; 4], out: &mut Vec<MeshVertex>) {
    let mut inside = [0usize; 4];
    let mut outside = [0usize; 4];
    let (mut ni, mut no) = (0, 0);
    for (i, c) in tet.iter().enumerate() {
        if c.value >= ISO_LEVEL {
            inside[ni] = i;
            ni += 1;
        } else {
            outside[no] = i;
            no += 1;
        }
    }
    let cut = |a: usize, b: usize| crossing(&tet[a], &tet[b]);
    match ni {
        1 => {
            let a = inside[0];
            push_triangle(out, cut(a, outside[0]), cut(a, outside[1]), cut(a, outside[2]));
        }
        3 => {
            let a = outside[0];
            push_triangle(out, cut(inside[0], a), cut(inside[1], a), cut(inside[2], a));
        }
        2 => {
            let (a, b) = (inside[0], inside[1]);
            let (c, d) = (outside[0], outside[1]);
            let (ac, ad, bd, bc) = (cut(a, c), cut(a, d), cut(b, d), cut(b, c));
            push_triangle(out, ac, ad, bd);
            push_triangle(out, ac, bd, bc);
        }
        _ => {}
    }
}

fn crossing(a: &Corner, b: &Corner) -> (Vec3, Vec3) {
    let span = b.value - a.value;
    let t = if span.abs() < f32::EPSILON {
        0.5
    } else {
        ((ISO_LEVEL - a.value) / span).clamp(0.0, 1.0)
    };
    (a.position.lerp(b.position, t), a.normal.lerp(b.normal, t))
}

/// Pushes a triangle wound so its face normal agrees with the field normal.
fn push_triangle(out: &mut Vec<MeshVertex>, a: (Vec3, Vec3), b: (Vec3, Vec3), c: (Vec3, Vec3)) {
    let face = (b.0 - a.0).cross(c.0 - a.0);
    if face.length_squared() <= f32::EPSILON * f32::EPSILON {
        return;
    }
    let flip = face.dot(a.1 + b.1 + c.1) < 0.0;
    let (b, c, face) = if flip { (c, b, -face) } else { (b, c, face) };
    let face_normal = face.normalize();
    for (p, n) in [a, b, c] {
        let n = n.try_normalize().unwrap_or(face_normal);
        out.push(MeshVertex {
            position: p.to_array(),
            normal: n.to_array(),
        });
    }
}
