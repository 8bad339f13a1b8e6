//! Particle cloud: a slowly tumbling cube of coloured points that ripple in
//! depth where the pointer passes.

use rand::Rng;

use crate::math::{Transform, Vec2, Vec3, hsl_to_rgb, planar_distance, proximity_factor};
use crate::render::{EntityDesc, EntityHandle, Geometry, Material, SceneRenderer};
use crate::theme::Theme;

/// Edge length of the cube the particles are scattered in.
pub const CLOUD_EXTENT: f32 = 20.0;
/// Per-frame spin around X and Y.
pub const SPIN: Vec3 = Vec3::new(0.0005, 0.001, 0.0);
/// Pointer influence radius in world units.
pub const INFLUENCE_RADIUS: f32 = 3.0;
/// Depth push per frame at full influence.
pub const PUSH: f32 = 0.1;
pub const POINT_SIZE: f32 = 0.05;
pub const OPACITY: f32 = 0.8;

pub struct ParticleCloud {
    handle: EntityHandle,
    positions: Vec<Vec3>,
    colors: Vec<[f32; 3]>,
    rotation: Vec3,
}

/// Draw one particle colour from the theme's HSL band.
fn particle_color(theme: Theme, rng: &mut impl Rng) -> [f32; 3] {
    let (hue, span, saturation, lightness) = theme.particle_hsl();
    hsl_to_rgb(hue + rng.r#gen::<f32>() * span, saturation, lightness)
}

impl ParticleCloud {
    pub fn spawn(count: usize, theme: Theme, rng: &mut impl Rng, renderer: &mut impl SceneRenderer) -> Self {
        let mut positions = Vec::with_capacity(count);
        let mut colors = Vec::with_capacity(count);
        for _ in 0..count {
            positions.push(Vec3::new(
                (rng.r#gen::<f32>() - 0.5) * CLOUD_EXTENT,
                (rng.r#gen::<f32>() - 0.5) * CLOUD_EXTENT,
                (rng.r#gen::<f32>() - 0.5) * CLOUD_EXTENT,
            ));
            colors.push(particle_color(theme, rng));
        }

        let handle = renderer.create(EntityDesc::new(
            "particles",
            Geometry::Points {
                positions: positions.clone(),
                colors: Some(colors.clone()),
            },
            Material::points(POINT_SIZE).with_opacity(OPACITY),
        ));

        Self {
            handle,
            positions,
            colors,
            rotation: Vec3::ZERO,
        }
    }

    /// Spin the cloud and push particles near the pointer along Z.
    ///
    /// Distances are measured on the particles' local coordinates, not their
    /// rotated world positions.
    pub fn update(&mut self, t: f32, pointer: Vec2) {
        self.rotation += SPIN;
        let wave = (t * 10.0).sin();
        for p in &mut self.positions {
            let force = proximity_factor(planar_distance(*p, pointer), INFLUENCE_RADIUS);
            if force > 0.0 {
                p.z += wave * force * PUSH;
            }
        }
    }

    pub fn sync(&self, renderer: &mut impl SceneRenderer) {
        renderer.set_transform(self.handle, Transform::IDENTITY.with_euler(self.rotation));
        renderer.set_positions(self.handle, &self.positions);
    }

    /// Re-roll every particle colour for a new theme.
    pub fn recolor(&mut self, theme: Theme, rng: &mut impl Rng, renderer: &mut impl SceneRenderer) {
        for c in &mut self.colors {
            *c = particle_color(theme, rng);
        }
        renderer.set_colors(self.handle, &self.colors);
    }

    pub fn despawn(&self, renderer: &mut impl SceneRenderer) {
        renderer.remove(self.handle);
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn colors(&self) -> &[[f32; 3]] {
        &self.colors
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
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

    fn cloud(count: usize) -> (ParticleCloud, HeadlessRenderer) {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(1);
        let cloud = ParticleCloud::spawn(count, Theme::Dark, &mut rng, &mut r);
        (cloud, r)
    }

    #[test]
    fn particles_stay_in_the_cube() {
        let (cloud, _) = cloud(300);
        assert_eq!(cloud.len(), 300);
        for p in cloud.positions() {
            assert!(p.abs().max_element() <= CLOUD_EXTENT / 2.0);
        }
    }

    #[test]
    fn only_nearby_particles_move() {
        let (mut cloud, _) = cloud(300);
        let before = cloud.positions().to_vec();
        let pointer = Vec2::new(2.0, -1.0);
        // sin(10 * 0.05) is well away from zero.
        cloud.update(0.05, pointer);
        for (old, new) in before.iter().zip(cloud.positions()) {
            let d = planar_distance(*old, pointer);
            if d >= INFLUENCE_RADIUS {
                assert_eq!(old, new);
            } else {
                let expected = old.z + (0.5_f32).sin() * proximity_factor(d, INFLUENCE_RADIUS) * PUSH;
                assert!((new.z - expected).abs() < 1e-6);
                assert_eq!(old.x, new.x);
            }
        }
        assert_eq!(cloud.rotation(), SPIN);
    }

    #[test]
    fn light_theme_recolors_every_particle() {
        let (mut cloud, mut r) = cloud(50);
        let mut rng = StdRng::seed_from_u64(2);
        cloud.recolor(Theme::Light, &mut rng, &mut r);
        let stored = r.get(cloud.handle()).unwrap().mesh.colors.clone().unwrap();
        assert_eq!(stored, cloud.colors());
        // Light particles are pale: lightness 0.8 keeps every channel high.
        for c in cloud.colors() {
            assert!(c.iter().all(|v| *v >= 0.6 - 1e-6));
        }
    }
}
