//! Solid shape kinds.
//!
//! A closed set: adding a shape means adding a variant and its arm in
//! [`ShapeKind::geometry`], and the compiler points at every match that needs
//! updating.

use serde::{Deserialize, Serialize};

use super::mesh::{self, MeshData};

/// Longitude and latitude subdivisions for spheres.
pub const SPHERE_SEGMENTS: u32 = 16;
/// Rim subdivisions for cones.
pub const CONE_SEGMENTS: u32 = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeKind {
    Sphere { radius: f32 },
    Box { size: f32 },
    Octahedron { radius: f32 },
    Tetrahedron { radius: f32 },
    Cone { radius: f32, height: f32 },
}

impl ShapeKind {
    /// Build the triangle mesh for this shape, centered at the origin.
    pub fn geometry(&self) -> MeshData {
        match *self {
            ShapeKind::Sphere { radius } => mesh::sphere(radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
            ShapeKind::Box { size } => mesh::cuboid(size),
            ShapeKind::Octahedron { radius } => mesh::octahedron(radius),
            ShapeKind::Tetrahedron { radius } => mesh::tetrahedron(radius),
            ShapeKind::Cone { radius, height } => mesh::cone(radius, height, CONE_SEGMENTS),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ShapeKind::Sphere { .. } => "sphere",
            ShapeKind::Box { .. } => "box",
            ShapeKind::Octahedron { .. } => "octahedron",
            ShapeKind::Tetrahedron { .. } => "tetrahedron",
            ShapeKind::Cone { .. } => "cone",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::Topology;

    #[test]
    fn every_kind_builds_triangles() {
        let kinds = [
            ShapeKind::Sphere { radius: 0.3 },
            ShapeKind::Box { size: 0.4 },
            ShapeKind::Octahedron { radius: 0.4 },
            ShapeKind::Tetrahedron { radius: 0.3 },
            ShapeKind::Cone { radius: 0.3, height: 0.6 },
        ];
        for kind in kinds {
            let mesh = kind.geometry();
            assert_eq!(mesh.topology, Topology::Triangles, "{}", kind.name());
            assert!(mesh.primitive_count() > 0, "{}", kind.name());
        }
    }

    #[test]
    fn serde_tags_by_kind() {
        let json = serde_json::to_string(&ShapeKind::Cone { radius: 0.3, height: 0.6 }).unwrap();
        assert_eq!(json, r#"{"kind":"cone","radius":0.3,"height":0.6}"#);
    }
}
