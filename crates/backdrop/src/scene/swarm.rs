//! # Instanced Swarm
//!
//! Hundreds of tiny boxes drawn with a single instanced draw call. Each
//! instance tumbles at its own speed and drifts around its origin; near the
//! pointer (mapped at twice the usual spread) instances are pulled in, pushed
//! toward the camera and scaled up.
//!
//! Only the instance matrices change per frame. The box mesh is uploaded once.

use std::f32::consts::TAU;

use rand::Rng;

use crate::math::{Mat4, Vec2, Vec3, euler_quat, planar_distance, proximity_factor};
use crate::render::{EntityDesc, EntityHandle, Geometry, Material, MaterialProperty, SceneRenderer, ShapeKind};
use crate::theme::Theme;

pub const BOX_SIZE: f32 = 0.1;
pub const INFLUENCE_RADIUS: f32 = 8.0;
pub const PULL: f32 = 0.02;
/// Depth push toward the camera at full influence.
pub const LIFT: f32 = 2.0;
/// Scale gain at full influence.
pub const GROW: f32 = 0.5;
pub const OPACITY: f32 = 0.8;
/// Spin multipliers applied to the rotation speed per axis.
pub const SPIN_AXES: Vec3 = Vec3::new(2.0, 1.4, 0.6);

/// Offset from the origin at animation time `t`.
pub fn drift(t: f32, speed: f32, phase: f32) -> Vec3 {
    Vec3::new(
        (t * speed * 1.6 + phase).cos() * 2.0,
        (t * speed * 2.0 + phase).sin() * 3.0,
        (t * speed + phase).sin() * 2.0,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwarmInstance {
    pub origin: Vec3,
    pub position: Vec3,
    pub rotation: Vec3,
    /// Scale assigned at creation; restored when the pointer moves away.
    pub base_scale: f32,
    pub scale: f32,
    pub rotation_speed: f32,
    pub float_speed: f32,
    pub phase: f32,
}

impl SwarmInstance {
    fn random(rng: &mut impl Rng) -> Self {
        let origin = Vec3::new(
            (rng.r#gen::<f32>() - 0.5) * 40.0,
            (rng.r#gen::<f32>() - 0.5) * 40.0,
            (rng.r#gen::<f32>() - 0.5) * 20.0 - 10.0,
        );
        let rotation = Vec3::new(
            rng.r#gen::<f32>() * TAU,
            rng.r#gen::<f32>() * TAU,
            rng.r#gen::<f32>() * TAU,
        );
        let scale = rng.gen_range(0.5..2.0);
        Self {
            origin,
            position: origin,
            rotation,
            base_scale: scale,
            scale,
            rotation_speed: rng.gen_range(0.01..0.03),
            float_speed: rng.gen_range(0.005..0.015),
            phase: rng.r#gen::<f32>() * TAU,
        }
    }

    fn update(&mut self, t: f32, pointer: Vec2) {
        self.rotation += SPIN_AXES * self.rotation_speed;
        self.position = self.origin + drift(t, self.float_speed, self.phase);

        let attraction = proximity_factor(planar_distance(self.position, pointer), INFLUENCE_RADIUS);
        if attraction > 0.0 {
            let pull = (pointer - self.position.truncate()) * attraction * PULL;
            self.position += pull.extend(attraction * LIFT);
            self.scale = 1.0 + attraction * GROW;
        } else {
            self.scale = self.base_scale;
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), euler_quat(self.rotation), self.position)
    }
}

pub struct InstancedSwarm {
    handle: EntityHandle,
    instances: Vec<SwarmInstance>,
    matrices: Vec<Mat4>,
}

impl InstancedSwarm {
    pub fn spawn(count: usize, theme: Theme, rng: &mut impl Rng, renderer: &mut impl SceneRenderer) -> Self {
        let instances: Vec<SwarmInstance> = (0..count).map(|_| SwarmInstance::random(rng)).collect();
        let matrices: Vec<Mat4> = instances.iter().map(SwarmInstance::matrix).collect();
        let handle = renderer.create(
            EntityDesc::new(
                "swarm",
                Geometry::Solid(ShapeKind::Box { size: BOX_SIZE }),
                Material::color(theme.accent()).with_opacity(OPACITY),
            )
            .with_instances(matrices.clone()),
        );
        Self {
            handle,
            instances,
            matrices,
        }
    }

    pub fn update(&mut self, t: f32, pointer: Vec2) {
        for (instance, matrix) in self.instances.iter_mut().zip(&mut self.matrices) {
            instance.update(t, pointer);
            *matrix = instance.matrix();
        }
    }

    pub fn sync(&self, renderer: &mut impl SceneRenderer) {
        renderer.set_instances(self.handle, &self.matrices);
    }

    pub fn recolor(&self, theme: Theme, renderer: &mut impl SceneRenderer) {
        renderer.set_material(self.handle, MaterialProperty::Color(theme.accent()));
    }

    pub fn despawn(&self, renderer: &mut impl SceneRenderer) {
        renderer.remove(self.handle);
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn instances(&self) -> &[SwarmInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn swarm(count: usize) -> (InstancedSwarm, HeadlessRenderer) {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(21);
        let swarm = InstancedSwarm::spawn(count, Theme::Dark, &mut rng, &mut r);
        (swarm, r)
    }

    #[test]
    fn creation_ranges() {
        let (swarm, r) = swarm(800);
        assert_eq!(swarm.len(), 800);
        assert_eq!(r.stats().instances, 800);
        for i in swarm.instances() {
            assert!(i.origin.x.abs() <= 20.0 && i.origin.y.abs() <= 20.0);
            assert!((-20.0..=0.0).contains(&i.origin.z));
            assert!((0.5..2.0).contains(&i.base_scale));
            assert!((0.01..0.03).contains(&i.rotation_speed));
            assert!((0.005..0.015).contains(&i.float_speed));
        }
    }

    #[test]
    fn far_instances_keep_their_creation_scale() {
        let (mut swarm, _) = swarm(50);
        swarm.update(2.0, Vec2::new(1000.0, 1000.0));
        for i in swarm.instances() {
            assert_eq!(i.scale, i.base_scale);
            let expected = i.origin + drift(2.0, i.float_speed, i.phase);
            assert!((i.position - expected).length() < 1e-5);
        }
    }

    #[test]
    fn near_instance_is_pulled_lifted_and_grown() {
        let (mut swarm, _) = swarm(1);
        let i = swarm.instances()[0];
        let drifted = i.origin + drift(1.0, i.float_speed, i.phase);
        // Pointer 4 units to the right: attraction 0.5.
        swarm.update(1.0, drifted.truncate() + Vec2::new(4.0, 0.0));
        let after = swarm.instances()[0];
        assert!((after.position.x - (drifted.x + 4.0 * 0.5 * PULL)).abs() < 1e-4);
        assert!((after.position.z - (drifted.z + 0.5 * LIFT)).abs() < 1e-4);
        assert!((after.scale - 1.25).abs() < 1e-5);

        swarm.update(1.0, Vec2::new(1000.0, 1000.0));
        assert_eq!(swarm.instances()[0].scale, i.base_scale);
    }

    #[test]
    fn sync_uploads_matrices() {
        let (mut swarm, mut r) = swarm(3);
        swarm.update(0.5, Vec2::ZERO);
        swarm.sync(&mut r);
        let stored = r.get(swarm.handle()).unwrap().instances.clone().unwrap();
        let expected: Vec<Mat4> = swarm.instances().iter().map(SwarmInstance::matrix).collect();
        assert_eq!(stored, expected);
    }
}
