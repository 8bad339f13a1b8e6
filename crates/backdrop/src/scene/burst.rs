//! Click bursts.
//!
//! A burst is a short-lived ring of coloured points spawned where a click ray
//! meets the `z = 0` plane. It fades linearly and jitters every frame, then
//! retires: removed from the renderer the same step its life reaches zero.

use std::f32::consts::TAU;

use rand::Rng;

use crate::math::{Vec3, hsl_to_rgb};
use crate::render::{EntityDesc, EntityHandle, Geometry, Material, MaterialProperty, SceneRenderer};

/// Radius of the spawn ring.
pub const RING_RADIUS: f32 = 0.5;
/// Depth jitter around the hit point.
pub const DEPTH_JITTER: f32 = 0.2;
/// Maximum random-walk step per axis per frame.
pub const JITTER: f32 = 0.1;
pub const POINT_SIZE: f32 = 0.1;

/// Life at or below this counts as spent; absorbs float error in `decay * steps`.
const LIFE_EPSILON: f32 = 1e-6;

pub struct ParticleBurst {
    handle: EntityHandle,
    positions: Vec<Vec3>,
    decay: f32,
    steps: u32,
    life: f32,
}

impl ParticleBurst {
    pub fn spawn(
        center: Vec3,
        count: usize,
        decay: f32,
        rng: &mut impl Rng,
        renderer: &mut impl SceneRenderer,
    ) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        for i in 0..count {
            let angle = i as f32 / count as f32 * TAU;
            let radius = rng.r#gen::<f32>() * RING_RADIUS;
            positions.push(Vec3::new(
                center.x + angle.cos() * radius,
                center.y + angle.sin() * radius,
                center.z + (rng.r#gen::<f32>() - 0.5) * DEPTH_JITTER,
            ));
            colors.push(hsl_to_rgb(rng.r#gen::<f32>(), 0.8, 0.6));
        }

        let handle = renderer.create(EntityDesc::new(
            "burst",
            Geometry::Points {
                positions: positions.clone(),
                colors: Some(colors),
            },
            Material::points(POINT_SIZE),
        ));

        Self {
            handle,
            positions,
            decay,
            steps: 0,
            life: 1.0,
        }
    }

    /// Advance one frame. Returns `false` once the burst is spent; the caller
    /// then removes it.
    ///
    /// Life is recomputed from the step count rather than accumulated, so a
    /// decay of `0.02` retires on exactly the 50th step.
    pub fn step(&mut self, rng: &mut impl Rng) -> bool {
        self.steps += 1;
        self.life = 1.0 - self.decay * self.steps as f32;
        if self.life <= LIFE_EPSILON {
            self.life = 0.0;
            return false;
        }
        for p in &mut self.positions {
            p.x += (rng.r#gen::<f32>() - 0.5) * JITTER;
            p.y += (rng.r#gen::<f32>() - 0.5) * JITTER;
            p.z += (rng.r#gen::<f32>() - 0.5) * JITTER;
        }
        true
    }

    pub fn sync(&self, renderer: &mut impl SceneRenderer) {
        renderer.set_material(self.handle, MaterialProperty::Opacity(self.life));
        renderer.set_positions(self.handle, &self.positions);
    }

    pub fn despawn(&self, renderer: &mut impl SceneRenderer) {
        renderer.remove(self.handle);
    }

    pub fn life(&self) -> f32 {
        self.life
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn is_spent(&self) -> bool {
        self.life <= 0.0
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn ring_around_center() {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(4);
        let center = Vec3::new(1.0, -2.0, 0.0);
        let burst = ParticleBurst::spawn(center, 20, 0.02, &mut rng, &mut r);
        assert_eq!(burst.len(), 20);
        for p in burst.positions() {
            assert!((p.truncate() - center.truncate()).length() <= RING_RADIUS + 1e-6);
            assert!((p.z - center.z).abs() <= DEPTH_JITTER / 2.0 + 1e-6);
        }
        let material = r.get(burst.handle()).unwrap().material;
        assert_eq!(material.blend, crate::render::Blend::Additive);
        assert_eq!(material.opacity, 1.0);
    }

    #[test]
    fn retires_after_exactly_fifty_steps() {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(4);
        let mut burst = ParticleBurst::spawn(Vec3::ZERO, 20, 0.02, &mut rng, &mut r);
        for n in 1..50 {
            assert!(burst.step(&mut rng), "burst spent early at step {n}");
            assert!((burst.life() - (1.0 - 0.02 * n as f32)).abs() < 1e-5);
        }
        assert!(!burst.step(&mut rng));
        assert_eq!(burst.steps(), 50);
        assert!(burst.is_spent());
    }

    #[test]
    fn opacity_tracks_life() {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(8);
        let mut burst = ParticleBurst::spawn(Vec3::ZERO, 5, 0.25, &mut rng, &mut r);
        burst.step(&mut rng);
        burst.sync(&mut r);
        assert_eq!(r.get(burst.handle()).unwrap().material.opacity, 0.75);
    }
}
