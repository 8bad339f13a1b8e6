//! # Rendering Capability
//!
//! The scene never talks to a graphics API. It describes entities once with
//! an [`EntityDesc`], keeps the returned [`EntityHandle`], and pushes updates
//! (transforms, instance matrices, vertex positions, material tweaks) through
//! the [`SceneRenderer`] trait. Once per frame it calls
//! [`render`](SceneRenderer::render) with the camera.
//!
//! ```text
//!   Scene ──create(desc)──▶ SceneRenderer ──▶ EntityHandle
//!     │                        ▲
//!     └─set_*/remove/render────┘
//! ```
//!
//! Two implementations ship with the crate:
//!
//! - [`HeadlessRenderer`]: an in-memory scene graph. Records everything,
//!   draws nothing. Tests and the `headless` demo run on it.
//! - [`WgpuRenderer`] (`gpu` feature): unlit forward renderer on a winit
//!   window surface.
//!
//! ## Comparison
//!
//! - **three.js**: `scene.add(mesh)` / `renderer.render(scene, camera)`. The
//!   handle replaces the object reference; `remove` replaces
//!   `scene.remove` + `geometry.dispose()` + `material.dispose()`.
//! - **Bevy**: entities with `Handle<Mesh>` and `Handle<Material>`, drawn by
//!   the render world. Same split between simulation and drawing, much more
//!   machinery.

pub mod handle;
pub mod headless;
pub mod mesh;
pub mod shape;

#[cfg(feature = "gpu")]
pub(crate) mod gpu;
#[cfg(feature = "gpu")]
mod pipeline;
#[cfg(feature = "gpu")]
mod wgpu_renderer;

pub use handle::EntityHandle;
pub use headless::HeadlessRenderer;
pub use mesh::{MeshData, Topology};
pub use shape::ShapeKind;
#[cfg(feature = "gpu")]
pub use wgpu_renderer::WgpuRenderer;

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;
use crate::math::{Mat4, Transform, Vec3};
use crate::scene::camera::Camera;

/// What an entity is made of.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A point cloud with optional per-point colours.
    Points {
        positions: Vec<Vec3>,
        colors: Option<Vec<[f32; 3]>>,
    },
    /// One of the closed set of solid shapes.
    Solid(ShapeKind),
    /// A subdivided plane in local XY.
    Grid {
        width: f32,
        height: f32,
        segments_x: u32,
        segments_y: u32,
    },
    /// Independent line segments.
    Lines { segments: Vec<[Vec3; 2]> },
}

impl Geometry {
    /// Build vertex data. Wireframe materials get the unique-edge line list.
    pub fn mesh(&self, wireframe: bool) -> MeshData {
        let mesh = match self {
            Geometry::Points { positions, colors } => mesh::points(positions, colors.as_deref()),
            Geometry::Solid(kind) => kind.geometry(),
            Geometry::Grid {
                width,
                height,
                segments_x,
                segments_y,
            } => mesh::grid(*width, *height, *segments_x, *segments_y),
            Geometry::Lines { segments } => mesh::line_segments(segments),
        };
        if wireframe { mesh.wireframe() } else { mesh }
    }
}

/// How fragments combine with what is already in the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Blend {
    /// Standard alpha blending.
    #[default]
    Normal,
    /// `src * alpha + dst`; overlapping particles glow.
    Additive,
}

/// Surface appearance. Everything is unlit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub color: [f32; 3],
    pub opacity: f32,
    pub emissive: [f32; 3],
    pub emissive_intensity: f32,
    pub wireframe: bool,
    pub blend: Blend,
    /// World-space point size, for point clouds.
    pub point_size: f32,
    /// Use per-vertex colours instead of `color`.
    pub vertex_colors: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            emissive: [0.0, 0.0, 0.0],
            emissive_intensity: 0.0,
            wireframe: false,
            blend: Blend::Normal,
            point_size: 1.0,
            vertex_colors: false,
        }
    }
}

impl Material {
    pub fn color(color: [f32; 3]) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    /// Additive, vertex-coloured points of the given size.
    pub fn points(size: f32) -> Self {
        Self {
            blend: Blend::Additive,
            point_size: size,
            vertex_colors: true,
            ..Default::default()
        }
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_emissive(mut self, emissive: [f32; 3], intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    pub fn wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }

    pub fn apply(&mut self, property: MaterialProperty) {
        match property {
            MaterialProperty::Color(color) => self.color = color,
            MaterialProperty::Opacity(opacity) => self.opacity = opacity,
            MaterialProperty::EmissiveIntensity(intensity) => self.emissive_intensity = intensity,
        }
    }
}

/// A single material field the scene changes while animating.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialProperty {
    Color([f32; 3]),
    Opacity(f32),
    EmissiveIntensity(f32),
}

/// Everything needed to create an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDesc {
    /// Debug label, e.g. `"particles"` or `"shape:cone"`.
    pub label: String,
    pub geometry: Geometry,
    pub material: Material,
    pub transform: Transform,
    /// Per-instance model matrices. `None` draws the geometry once.
    pub instances: Option<Vec<Mat4>>,
}

impl EntityDesc {
    pub fn new(label: impl Into<String>, geometry: Geometry, material: Material) -> Self {
        Self {
            label: label.into(),
            geometry,
            material,
            transform: Transform::IDENTITY,
            instances: None,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_instances(mut self, instances: Vec<Mat4>) -> Self {
        self.instances = Some(instances);
        self
    }
}

/// Counters reported by a renderer, sent along with diagnostics snapshots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    /// Live entities.
    pub entities: usize,
    /// Draw calls issued by the last frame.
    pub draw_calls: usize,
    /// Vertices across all live entities.
    pub vertices: usize,
    /// Instances across all instanced entities.
    pub instances: usize,
    /// Frames rendered since creation.
    pub frames: u64,
}

/// The rendering capability the scene draws through.
///
/// Handles that no longer refer to a live entity are ignored by every method.
pub trait SceneRenderer {
    /// Create an entity and return its handle.
    fn create(&mut self, desc: EntityDesc) -> EntityHandle;

    fn set_transform(&mut self, handle: EntityHandle, transform: Transform);

    /// Replace the instance matrices of an instanced entity.
    fn set_instances(&mut self, handle: EntityHandle, instances: &[Mat4]);

    /// Overwrite vertex positions in local space. The vertex count must not
    /// change; extra or missing positions are ignored.
    fn set_positions(&mut self, handle: EntityHandle, positions: &[Vec3]);

    /// Overwrite per-vertex colours.
    fn set_colors(&mut self, handle: EntityHandle, colors: &[[f32; 3]]);

    fn set_material(&mut self, handle: EntityHandle, property: MaterialProperty);

    /// Remove an entity and release its resources. Returns `false` for stale
    /// handles.
    fn remove(&mut self, handle: EntityHandle) -> bool;

    /// The drawing surface changed size.
    fn resize(&mut self, width: u32, height: u32);

    /// Background colour behind the scene.
    fn set_clear_color(&mut self, _color: [f64; 4]) {}

    /// Draw every live entity from the camera's point of view.
    fn render(&mut self, camera: &Camera) -> Result<(), BackdropError>;

    /// Remove every entity.
    fn clear(&mut self);

    fn stats(&self) -> RenderStats;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wireframe_geometry_becomes_lines() {
        let geometry = Geometry::Solid(ShapeKind::Octahedron { radius: 0.4 });
        assert_eq!(geometry.mesh(false).topology, Topology::Triangles);
        assert_eq!(geometry.mesh(true).topology, Topology::Lines);
    }

    #[test]
    fn material_property_applies() {
        let mut material = Material::color([0.0, 0.0, 0.0]).with_opacity(0.5);
        material.apply(MaterialProperty::Opacity(0.8));
        material.apply(MaterialProperty::EmissiveIntensity(0.3));
        material.apply(MaterialProperty::Color([1.0, 0.0, 0.0]));
        assert_eq!(material.opacity, 0.8);
        assert_eq!(material.emissive_intensity, 0.3);
        assert_eq!(material.color, [1.0, 0.0, 0.0]);
    }
}
