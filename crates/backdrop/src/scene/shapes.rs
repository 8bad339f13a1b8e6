//! Floating wireframe shapes.
//!
//! Five fixed solids bob around their home positions on three out-of-phase
//! sine waves. When the pointer comes within [`INFLUENCE_RADIUS`] they lean
//! toward it and brighten.

use std::f32::consts::TAU;

use rand::Rng;

use crate::math::{Transform, Vec2, Vec3, planar_distance, proximity_factor, rgb_hex};
use crate::render::{EntityDesc, EntityHandle, Geometry, Material, MaterialProperty, SceneRenderer, ShapeKind};
use crate::theme::{DEEP_TEAL, MIST, TEAL, Theme};

pub const INFLUENCE_RADIUS: f32 = 5.0;
/// Fraction of the gap to the pointer closed per frame at full influence.
pub const PULL: f32 = 0.01;
pub const MAX_OPACITY: f32 = 0.8;
/// Spin multipliers applied to the rotation speed per axis.
pub const SPIN_AXES: Vec3 = Vec3::new(2.0, 1.4, 0.6);

/// Kind, home position and starting colour of each shape.
pub const LAYOUT: [(ShapeKind, [f32; 3], u32); 5] = [
    (ShapeKind::Sphere { radius: 0.3 }, [-4.0, -2.0, -3.0], TEAL),
    (ShapeKind::Octahedron { radius: 0.4 }, [0.0, 3.0, -4.0], DEEP_TEAL),
    (ShapeKind::Box { size: 0.4 }, [4.0, 2.0, -2.0], MIST),
    (ShapeKind::Tetrahedron { radius: 0.3 }, [-2.0, 1.0, -5.0], TEAL),
    (ShapeKind::Cone { radius: 0.3, height: 0.6 }, [2.0, -1.0, -4.0], DEEP_TEAL),
];

/// Resting opacity for a given intensity.
pub fn rest_opacity(intensity: f32) -> f32 {
    0.1 + intensity * 0.2
}

/// Offset from the home position at animation time `t`.
pub fn float_offset(t: f32, speed: f32, phase: f32) -> Vec3 {
    Vec3::new(
        (t * speed * 1.6 + phase).cos() * 0.8,
        (t * speed * 2.0 + phase).sin() * 1.2,
        (t * speed * 0.5 + phase).sin() * 0.3,
    )
}

pub struct FloatingShape {
    handle: EntityHandle,
    kind: ShapeKind,
    home: Vec3,
    position: Vec3,
    rotation: Vec3,
    rotation_speed: f32,
    float_speed: f32,
    phase: f32,
    rest_opacity: f32,
    opacity: f32,
}

impl FloatingShape {
    pub fn spawn(
        kind: ShapeKind,
        home: Vec3,
        color: [f32; 3],
        intensity: f32,
        rng: &mut impl Rng,
        renderer: &mut impl SceneRenderer,
    ) -> Self {
        let rest = rest_opacity(intensity);
        let handle = renderer.create(
            EntityDesc::new(
                format!("shape:{}", kind.name()),
                Geometry::Solid(kind),
                Material::color(color).with_opacity(rest).wireframe(),
            )
            .with_transform(Transform::from_translation(home)),
        );
        Self {
            handle,
            kind,
            home,
            position: home,
            rotation: Vec3::ZERO,
            rotation_speed: rng.gen_range(0.005..0.01),
            float_speed: rng.gen_range(0.005..0.01),
            phase: rng.r#gen::<f32>() * TAU,
            rest_opacity: rest,
            opacity: rest,
        }
    }

    /// Spawn the fixed set from [`LAYOUT`].
    pub fn spawn_all(intensity: f32, rng: &mut impl Rng, renderer: &mut impl SceneRenderer) -> Vec<Self> {
        LAYOUT
            .iter()
            .map(|(kind, home, color)| {
                Self::spawn(*kind, Vec3::from_array(*home), rgb_hex(*color), intensity, rng, renderer)
            })
            .collect()
    }

    pub fn update(&mut self, t: f32, pointer: Vec2) {
        self.rotation += SPIN_AXES * self.rotation_speed;
        self.position = self.home + float_offset(t, self.float_speed, self.phase);

        let attraction = proximity_factor(planar_distance(self.position, pointer), INFLUENCE_RADIUS);
        if attraction > 0.0 {
            let pull = (pointer - self.position.truncate()) * attraction * PULL;
            self.position.x += pull.x;
            self.position.y += pull.y;
            self.opacity = (self.rest_opacity + attraction * 0.3).min(MAX_OPACITY);
        } else {
            self.opacity = self.rest_opacity;
        }
    }

    pub fn sync(&self, renderer: &mut impl SceneRenderer) {
        renderer.set_transform(
            self.handle,
            Transform::from_translation(self.position).with_euler(self.rotation),
        );
        renderer.set_material(self.handle, MaterialProperty::Opacity(self.opacity));
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

    pub fn kind(&self) -> ShapeKind {
        self.kind
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn float_speed(&self) -> f32 {
        self.float_speed
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn shapes() -> (Vec<FloatingShape>, HeadlessRenderer) {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(9);
        let shapes = FloatingShape::spawn_all(1.0, &mut rng, &mut r);
        (shapes, r)
    }

    #[test]
    fn five_wireframe_shapes() {
        let (shapes, r) = shapes();
        assert_eq!(shapes.len(), 5);
        assert_eq!(r.with_label("shape:").count(), 5);
        for s in &shapes {
            assert!(r.get(s.handle()).unwrap().material.wireframe);
            assert!((0.005..0.01).contains(&s.rotation_speed));
            assert!((0.0..TAU).contains(&s.phase()));
        }
    }

    #[test]
    fn far_pointer_leaves_float_path_alone() {
        let (mut shapes, _) = shapes();
        let s = &mut shapes[0];
        s.update(3.0, Vec2::new(100.0, 100.0));
        let expected = s.home() + float_offset(3.0, s.float_speed(), s.phase());
        assert!((s.position() - expected).length() < 1e-6);
        assert!((s.opacity() - rest_opacity(1.0)).abs() < 1e-6);
    }

    #[test]
    fn near_pointer_pulls_and_brightens() {
        let (mut shapes, _) = shapes();
        let s = &mut shapes[2];
        let floated = s.home() + float_offset(1.0, s.float_speed(), s.phase());
        let pointer = floated.truncate() + Vec2::new(1.0, 0.0);
        s.update(1.0, pointer);
        // Distance 1 inside radius 5: attraction 0.8.
        assert!((s.position().x - (floated.x + 0.8 * PULL)).abs() < 1e-5);
        assert!((s.opacity() - (rest_opacity(1.0) + 0.24)).abs() < 1e-5);

        s.update(1.0, Vec2::new(100.0, 100.0));
        assert!((s.opacity() - rest_opacity(1.0)).abs() < 1e-6);
    }

    #[test]
    fn pointer_on_top_adds_full_boost() {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(3);
        let mut s = FloatingShape::spawn(ShapeKind::Box { size: 1.0 }, Vec3::ZERO, [1.0; 3], 1.0, &mut rng, &mut r);
        let at = s.home() + float_offset(0.0, s.float_speed(), s.phase());
        s.update(0.0, at.truncate());
        assert!((s.opacity() - 0.6).abs() < 1e-6);
        assert!(s.opacity() <= MAX_OPACITY);

        s.sync(&mut r);
        assert!((r.get(s.handle()).unwrap().material.opacity - 0.6).abs() < 1e-6);
    }
}
