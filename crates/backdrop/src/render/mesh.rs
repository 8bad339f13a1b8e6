//! # Mesh: CPU-Side Geometry
//!
//! Every entity the scene creates is described by plain vertex and index data
//! before any renderer sees it. The generators here produce that data for the
//! handful of primitives the background needs: point sets, line segments, a
//! subdivided plane, and the five solid shapes.
//!
//! ## No Normals, No UVs
//!
//! The background is drawn unlit: flat colour, opacity, and an emissive term.
//! Vertices therefore carry only a position (plus an optional colour for point
//! clouds), so a box needs 8 corners rather than 24 face-split vertices.
//!
//! ## Wireframes
//!
//! Wireframe materials don't rasterize triangles at all. [`MeshData::wireframe`]
//! walks the triangle list and emits each unique edge once, in the order it
//! is first seen, as a line list over the *same* vertices. Animated meshes
//! (the wave surface) can then keep rewriting positions without touching the
//! index buffer.
//!
//! ```text
//!  triangles (0,1,3) (1,2,3)          edges 0-1 1-3 3-0 1-2 2-3
//!
//!   0───3                              0───3
//!   │ ╱ │          wireframe()         │ ╱ │
//!   1───2         ───────────▶         1───2
//! ```
//!
//! ## Comparison
//!
//! - **three.js**: `PlaneGeometry`, `SphereGeometry`, `OctahedronGeometry`
//!   and friends. The vertex order of [`grid`] and [`sphere`] matches theirs.
//! - **Bevy**: `Mesh` with named attribute arrays; same idea, more attributes.

use std::collections::HashSet;
use std::f32::consts::{PI, TAU};

use crate::math::Vec3;

/// How the index list is assembled into primitives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topology {
    Points,
    Lines,
    Triangles,
}

/// Vertex and index data for one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex colours; `None` means the material colour is used.
    pub colors: Option<Vec<[f32; 3]>>,
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles, lines or points, depending on topology.
    pub fn primitive_count(&self) -> usize {
        match self.topology {
            Topology::Points => self.indices.len(),
            Topology::Lines => self.indices.len() / 2,
            Topology::Triangles => self.indices.len() / 3,
        }
    }

    /// Convert a triangle mesh into the line list of its unique edges.
    ///
    /// Points and lines are returned unchanged.
    pub fn wireframe(mut self) -> Self {
        if self.topology != Topology::Triangles {
            return self;
        }
        let mut seen = HashSet::with_capacity(self.indices.len());
        let mut lines = Vec::with_capacity(self.indices.len() * 2);
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                let key = (a.min(b), a.max(b));
                if a != b && seen.insert(key) {
                    lines.extend_from_slice(&[a, b]);
                }
            }
        }
        self.indices = lines;
        self.topology = Topology::Lines;
        self
    }
}

fn vec3(v: Vec3) -> [f32; 3] {
    v.to_array()
}

// ── Point and line sets ──

/// A point list, one point per position.
pub fn points(positions: &[Vec3], colors: Option<&[[f32; 3]]>) -> MeshData {
    MeshData {
        positions: positions.iter().copied().map(vec3).collect(),
        colors: colors.map(|c| c.to_vec()),
        indices: (0..positions.len() as u32).collect(),
        topology: Topology::Points,
    }
}

/// A line list with two vertices per segment.
pub fn line_segments(segments: &[[Vec3; 2]]) -> MeshData {
    let positions: Vec<[f32; 3]> = segments
        .iter()
        .flat_map(|[a, b]| [vec3(*a), vec3(*b)])
        .collect();
    MeshData {
        indices: (0..positions.len() as u32).collect(),
        positions,
        colors: None,
        topology: Topology::Lines,
    }
}

// ── Plane ──

/// A `width × height` plane in the XY plane (normal +Z), subdivided into
/// `segments_x × segments_y` quads.
///
/// Rows run from `+height/2` down to `-height/2`, columns from `-width/2` to
/// `+width/2`, so vertex `ix + iy * (segments_x + 1)` sits at
/// `(ix * seg_w - width/2, height/2 - iy * seg_h, 0)`.
pub fn grid(width: f32, height: f32, segments_x: u32, segments_y: u32) -> MeshData {
    let gx = segments_x.max(1);
    let gy = segments_y.max(1);
    let seg_w = width / gx as f32;
    let seg_h = height / gy as f32;
    let row = gx + 1;

    let mut positions = Vec::with_capacity(((gx + 1) * (gy + 1)) as usize);
    for iy in 0..=gy {
        let y = height * 0.5 - iy as f32 * seg_h;
        for ix in 0..=gx {
            let x = ix as f32 * seg_w - width * 0.5;
            positions.push([x, y, 0.0]);
        }
    }

    let mut indices = Vec::with_capacity((gx * gy * 6) as usize);
    for iy in 0..gy {
        for ix in 0..gx {
            let a = ix + row * iy;
            let b = ix + row * (iy + 1);
            let c = ix + 1 + row * (iy + 1);
            let d = ix + 1 + row * iy;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    MeshData {
        positions,
        colors: None,
        indices,
        topology: Topology::Triangles,
    }
}

// ── Solids ──

/// An axis-aligned cube with side `size`, centered at the origin.
pub fn cuboid(size: f32) -> MeshData {
    let h = size * 0.5;
    let positions = vec![
        [-h, -h, h],
        [h, -h, h],
        [h, h, h],
        [-h, h, h],
        [-h, -h, -h],
        [h, -h, -h],
        [h, h, -h],
        [-h, h, -h],
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 1, 2, 0, 2, 3, // +Z
        5, 4, 7, 5, 7, 6, // -Z
        1, 5, 6, 1, 6, 2, // +X
        4, 0, 3, 4, 3, 7, // -X
        3, 2, 6, 3, 6, 7, // +Y
        4, 5, 1, 4, 1, 0, // -Y
    ];
    MeshData {
        positions,
        colors: None,
        indices,
        topology: Topology::Triangles,
    }
}

/// A UV sphere of `radius` with `width_segments` around and `height_segments`
/// from pole to pole.
///
/// The pole rows collapse to a single point, so their degenerate triangles are
/// skipped: `width * (height - 1) * 2` triangles in total.
pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let w = width_segments.max(3);
    let h = height_segments.max(2);
    let row = w + 1;

    let mut positions = Vec::with_capacity(((w + 1) * (h + 1)) as usize);
    for iy in 0..=h {
        let v = iy as f32 / h as f32;
        for ix in 0..=w {
            let u = ix as f32 / w as f32;
            positions.push([
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            ]);
        }
    }

    let mut indices = Vec::with_capacity((w * (h - 1) * 6) as usize);
    for iy in 0..h {
        for ix in 0..w {
            let a = row * iy + ix + 1;
            let b = row * iy + ix;
            let c = row * (iy + 1) + ix;
            let d = row * (iy + 1) + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData {
        positions,
        colors: None,
        indices,
        topology: Topology::Triangles,
    }
}

/// A regular octahedron with its six vertices on the axes at `radius`.
pub fn octahedron(radius: f32) -> MeshData {
    let r = radius;
    let positions = vec![
        [r, 0.0, 0.0],
        [-r, 0.0, 0.0],
        [0.0, r, 0.0],
        [0.0, -r, 0.0],
        [0.0, 0.0, r],
        [0.0, 0.0, -r],
    ];
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 4, 0, 4, 3, 0, 3, 5, 0, 5, 2,
        1, 2, 5, 1, 5, 3, 1, 3, 4, 1, 4, 2,
    ];
    MeshData {
        positions,
        colors: None,
        indices,
        topology: Topology::Triangles,
    }
}

/// A regular tetrahedron inscribed in a sphere of `radius`.
pub fn tetrahedron(radius: f32) -> MeshData {
    let positions = [
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(-1.0, 1.0, -1.0),
        Vec3::new(1.0, -1.0, -1.0),
    ]
    .into_iter()
    .map(|v| vec3(v.normalize() * radius))
    .collect();
    MeshData {
        positions,
        colors: None,
        indices: vec![2, 1, 0, 0, 3, 2, 1, 3, 0, 2, 3, 1],
        topology: Topology::Triangles,
    }
}

/// A cone along +Y: apex at `height/2`, base circle of `radius` at
/// `-height/2`, closed by a base cap.
pub fn cone(radius: f32, height: f32, segments: u32) -> MeshData {
    let seg = segments.max(3);
    let half = height * 0.5;

    // apex, rim × seg, base center
    let mut positions = Vec::with_capacity(seg as usize + 2);
    positions.push([0.0, half, 0.0]);
    for i in 0..seg {
        let theta = i as f32 / seg as f32 * TAU;
        positions.push([radius * theta.sin(), -half, radius * theta.cos()]);
    }
    let center = positions.len() as u32;
    positions.push([0.0, -half, 0.0]);

    let mut indices = Vec::with_capacity(seg as usize * 6);
    for i in 0..seg {
        let curr = 1 + i;
        let next = 1 + (i + 1) % seg;
        indices.extend_from_slice(&[0, curr, next]);
    }
    for i in 0..seg {
        let curr = 1 + i;
        let next = 1 + (i + 1) % seg;
        indices.extend_from_slice(&[center, next, curr]);
    }

    MeshData {
        positions,
        colors: None,
        indices,
        topology: Topology::Triangles,
    }
}
