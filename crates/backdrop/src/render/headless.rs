//! In-memory renderer.
//!
//! [`HeadlessRenderer`] keeps every entity's mesh, material, transform and
//! instances exactly as the scene last set them, and counts frames instead of
//! drawing. It is the renderer the integration tests inspect, and the one the
//! loop falls back to on machines without a GPU.

use super::handle::{EntityHandle, Slots};
use super::{EntityDesc, Material, MaterialProperty, MeshData, RenderStats, SceneRenderer};
use crate::error::BackdropError;
use crate::math::{Mat4, Transform, Vec3};
use crate::scene::camera::Camera;

/// An entity as the headless renderer stores it.
#[derive(Debug, Clone)]
pub struct HeadlessEntity {
    pub label: String,
    pub mesh: MeshData,
    pub material: Material,
    pub transform: Transform,
    pub instances: Option<Vec<Mat4>>,
}

#[derive(Default)]
pub struct HeadlessRenderer {
    entities: Slots<HeadlessEntity>,
    size: (u32, u32),
    clear_color: [f64; 4],
    frames: u64,
    created: u64,
    removed: u64,
    last_view_proj: Option<Mat4>,
    fail_at_frame: Option<u64>,
}

impl HeadlessRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }

    /// Make the `frame`-th call to `render` (1-based) fail with a surface
    /// error, as a lost GPU would.
    pub fn failing_at(mut self, frame: u64) -> Self {
        self.fail_at_frame = Some(frame);
        self
    }

    pub fn get(&self, handle: EntityHandle) -> Option<&HeadlessEntity> {
        self.entities.get(handle)
    }

    /// Live entities in creation-slot order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityHandle, &HeadlessEntity)> {
        self.entities.iter()
    }

    /// Live entities whose label starts with `prefix`.
    pub fn with_label<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a HeadlessEntity> + 'a {
        self.entities
            .iter()
            .filter_map(move |(_, e)| e.label.starts_with(prefix).then_some(e))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    pub fn clear_color(&self) -> [f64; 4] {
        self.clear_color
    }

    /// Entities created since construction, including removed ones.
    pub fn created_total(&self) -> u64 {
        self.created
    }

    /// Entities removed since construction.
    pub fn removed_total(&self) -> u64 {
        self.removed
    }

    /// View-projection of the camera passed to the last successful `render`.
    pub fn last_view_proj(&self) -> Option<Mat4> {
        self.last_view_proj
    }
}

impl SceneRenderer for HeadlessRenderer {
    fn create(&mut self, desc: EntityDesc) -> EntityHandle {
        let mesh = desc.geometry.mesh(desc.material.wireframe);
        self.created += 1;
        self.entities.insert(HeadlessEntity {
            label: desc.label,
            mesh,
            material: desc.material,
            transform: desc.transform,
            instances: desc.instances,
        })
    }

    fn set_transform(&mut self, handle: EntityHandle, transform: Transform) {
        if let Some(entity) = self.entities.get_mut(handle) {
            entity.transform = transform;
        }
    }

    fn set_instances(&mut self, handle: EntityHandle, instances: &[Mat4]) {
        if let Some(entity) = self.entities.get_mut(handle) {
            entity.instances = Some(instances.to_vec());
        }
    }

    fn set_positions(&mut self, handle: EntityHandle, positions: &[Vec3]) {
        if let Some(entity) = self.entities.get_mut(handle) {
            for (dst, src) in entity.mesh.positions.iter_mut().zip(positions) {
                *dst = src.to_array();
            }
        }
    }

    fn set_colors(&mut self, handle: EntityHandle, colors: &[[f32; 3]]) {
        if let Some(entity) = self.entities.get_mut(handle) {
            let n = entity.mesh.positions.len();
            let dst = entity.mesh.colors.get_or_insert_with(|| vec![[1.0; 3]; n]);
            for (d, s) in dst.iter_mut().zip(colors) {
                *d = *s;
            }
        }
    }

    fn set_material(&mut self, handle: EntityHandle, property: MaterialProperty) {
        if let Some(entity) = self.entities.get_mut(handle) {
            entity.material.apply(property);
        }
    }

    fn remove(&mut self, handle: EntityHandle) -> bool {
        let removed = self.entities.remove(handle).is_some();
        if removed {
            self.removed += 1;
        }
        removed
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_clear_color(&mut self, color: [f64; 4]) {
        self.clear_color = color;
    }

    fn render(&mut self, camera: &Camera) -> Result<(), BackdropError> {
        if self.fail_at_frame == Some(self.frames + 1) {
            return Err(BackdropError::Surface("device lost".to_string()));
        }
        self.frames += 1;
        self.last_view_proj = Some(camera.view_proj());
        Ok(())
    }

    fn clear(&mut self) {
        self.removed += self.entities.len() as u64;
        self.entities.clear();
    }

    fn stats(&self) -> RenderStats {
        let mut stats = RenderStats {
            entities: self.entities.len(),
            frames: self.frames,
            ..Default::default()
        };
        for (_, entity) in self.entities.iter() {
            stats.vertices += entity.mesh.vertex_count();
            if let Some(instances) = &entity.instances {
                stats.instances += instances.len();
            }
            if !entity.mesh.indices.is_empty() && entity.material.opacity > 0.0 {
                stats.draw_calls += 1;
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Geometry, ShapeKind};

    fn shape_desc() -> EntityDesc {
        EntityDesc::new(
            "shape:box",
            Geometry::Solid(ShapeKind::Box { size: 1.0 }),
            Material::color([1.0, 0.0, 0.0]).wireframe(),
        )
    }

    #[test]
    fn create_update_remove() {
        let mut r = HeadlessRenderer::new(800, 600);
        let h = r.create(shape_desc());
        r.set_transform(h, Transform::from_xyz(1.0, 2.0, 3.0));
        r.set_material(h, MaterialProperty::Opacity(0.25));
        let e = r.get(h).unwrap();
        assert_eq!(e.transform.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(e.material.opacity, 0.25);
        assert_eq!(e.mesh.topology, crate::render::Topology::Lines);

        assert!(r.remove(h));
        assert!(!r.remove(h));
        assert!(r.is_empty());
        assert_eq!(r.removed_total(), 1);
    }

    #[test]
    fn stale_handles_are_ignored() {
        let mut r = HeadlessRenderer::new(800, 600);
        let old = r.create(shape_desc());
        r.remove(old);
        let new = r.create(shape_desc());
        r.set_material(old, MaterialProperty::Opacity(0.0));
        assert_eq!(r.get(new).unwrap().material.opacity, 1.0);
    }

    #[test]
    fn set_colors_fills_missing_attribute() {
        let mut r = HeadlessRenderer::new(800, 600);
        let h = r.create(shape_desc());
        r.set_colors(h, &[[0.5, 0.5, 0.5]]);
        let colors = r.get(h).unwrap().mesh.colors.as_ref().unwrap();
        assert_eq!(colors.len(), 8);
        assert_eq!(colors[0], [0.5, 0.5, 0.5]);
        assert_eq!(colors[1], [1.0, 1.0, 1.0]);
    }

    #[test]
    fn injected_failure_hits_the_requested_frame() {
        let mut r = HeadlessRenderer::new(800, 600).failing_at(2);
        let camera = Camera::new(1.0);
        assert!(r.render(&camera).is_ok());
        assert!(matches!(r.render(&camera), Err(BackdropError::Surface(_))));
        assert_eq!(r.frames(), 1);
    }

    #[test]
    fn stats_count_instances_and_vertices() {
        let mut r = HeadlessRenderer::new(800, 600);
        r.create(shape_desc().with_instances(vec![Mat4::IDENTITY; 3]));
        r.create(shape_desc());
        let stats = r.stats();
        assert_eq!(stats.entities, 2);
        assert_eq!(stats.vertices, 16);
        assert_eq!(stats.instances, 3);
        assert_eq!(stats.draw_calls, 2);
    }
}
