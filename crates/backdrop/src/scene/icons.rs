//! Orbit icons: five small octahedra circling the scene on a flattened
//! ellipse, rising toward the viewer and glowing when the pointer is near.

use std::f32::consts::TAU;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::{Transform, Vec2, Vec3, planar_distance, proximity_factor, rgb_hex};
use crate::render::{EntityDesc, EntityHandle, Geometry, Material, MaterialProperty, SceneRenderer, ShapeKind};
use crate::theme::TEAL;

pub const ORBIT_RADIUS: f32 = 8.0;
/// Vertical squash of the orbit ellipse.
pub const ORBIT_SQUASH: f32 = 0.3;
pub const ORBIT_DEPTH: f32 = -3.0;
pub const ICON_RADIUS: f32 = 0.2;
pub const INFLUENCE_RADIUS: f32 = 4.0;
/// How far toward the camera an icon rises at full influence.
pub const LIFT: f32 = 2.0;
pub const EMISSIVE_REST: f32 = 0.2;
pub const EMISSIVE_BOOST: f32 = 0.3;
/// Dim teal glow colour.
pub const EMISSIVE_COLOR: u32 = 0x001A1F;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    Code,
    Ai,
    Data,
    Web,
    Research,
}

impl IconKind {
    pub const ALL: [IconKind; 5] = [
        IconKind::Code,
        IconKind::Ai,
        IconKind::Data,
        IconKind::Web,
        IconKind::Research,
    ];

    pub fn label(self) -> &'static str {
        match self {
            IconKind::Code => "code",
            IconKind::Ai => "ai",
            IconKind::Data => "data",
            IconKind::Web => "web",
            IconKind::Research => "research",
        }
    }
}

impl fmt::Display for IconKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Position on the orbit at `angle`, before pointer lift.
pub fn orbit_position(angle: f32) -> Vec3 {
    Vec3::new(
        angle.cos() * ORBIT_RADIUS,
        angle.sin() * ORBIT_RADIUS * ORBIT_SQUASH,
        ORBIT_DEPTH,
    )
}

pub struct OrbitIcon {
    handle: EntityHandle,
    kind: IconKind,
    offset: f32,
    orbit_speed: f32,
    rotation_speed: f32,
    rotation: Vec3,
    position: Vec3,
    emissive: f32,
}

impl OrbitIcon {
    pub fn spawn(
        kind: IconKind,
        slot: usize,
        total: usize,
        intensity: f32,
        rng: &mut impl Rng,
        renderer: &mut impl SceneRenderer,
    ) -> Self {
        let offset = slot as f32 / total.max(1) as f32 * TAU;
        let position = orbit_position(offset);
        let handle = renderer.create(
            EntityDesc::new(
                format!("icon:{kind}"),
                Geometry::Solid(ShapeKind::Octahedron { radius: ICON_RADIUS }),
                Material::color(rgb_hex(TEAL))
                    .with_opacity(0.4 + intensity * 0.3)
                    .with_emissive(rgb_hex(EMISSIVE_COLOR), EMISSIVE_REST),
            )
            .with_transform(Transform::from_translation(position)),
        );
        Self {
            handle,
            kind,
            offset,
            rotation_speed: rng.gen_range(0.01..0.02),
            orbit_speed: rng.gen_range(0.005..0.01),
            rotation: Vec3::ZERO,
            position,
            emissive: EMISSIVE_REST,
        }
    }

    /// One icon per [`IconKind`], evenly spaced around the orbit.
    pub fn spawn_all(intensity: f32, rng: &mut impl Rng, renderer: &mut impl SceneRenderer) -> Vec<Self> {
        IconKind::ALL
            .iter()
            .enumerate()
            .map(|(slot, kind)| Self::spawn(*kind, slot, IconKind::ALL.len(), intensity, rng, renderer))
            .collect()
    }

    pub fn update(&mut self, t: f32, pointer: Vec2) {
        self.rotation.x += self.rotation_speed;
        self.rotation.y += self.rotation_speed * 0.7;

        self.position = orbit_position(self.offset + t * self.orbit_speed);
        let attraction = proximity_factor(planar_distance(self.position, pointer), INFLUENCE_RADIUS);
        self.position.z = ORBIT_DEPTH + attraction * LIFT;
        self.emissive = EMISSIVE_REST + attraction * EMISSIVE_BOOST;
    }

    pub fn sync(&self, renderer: &mut impl SceneRenderer) {
        renderer.set_transform(
            self.handle,
            Transform::from_translation(self.position).with_euler(self.rotation),
        );
        renderer.set_material(self.handle, MaterialProperty::EmissiveIntensity(self.emissive));
    }

    pub fn despawn(&self, renderer: &mut impl SceneRenderer) {
        renderer.remove(self.handle);
    }

    pub fn kind(&self) -> IconKind {
        self.kind
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn orbit_speed(&self) -> f32 {
        self.orbit_speed
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn emissive(&self) -> f32 {
        self.emissive
    }

    pub fn handle(&self) -> EntityHandle {
        self.handle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn icons() -> (Vec<OrbitIcon>, HeadlessRenderer) {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut rng = StdRng::seed_from_u64(11);
        let icons = OrbitIcon::spawn_all(1.0, &mut rng, &mut r);
        (icons, r)
    }

    #[test]
    fn evenly_spaced_offsets() {
        let (icons, r) = icons();
        assert_eq!(icons.len(), 5);
        for (k, icon) in icons.iter().enumerate() {
            assert!((icon.offset() - k as f32 * TAU / 5.0).abs() < 1e-6);
        }
        assert_eq!(r.with_label("icon:").count(), 5);
        assert!(r.with_label("icon:research").next().is_some());
    }

    #[test]
    fn idle_icon_stays_on_the_ellipse() {
        let (mut icons, _) = icons();
        let icon = &mut icons[1];
        icon.update(10.0, Vec2::new(100.0, 100.0));
        let expected = orbit_position(icon.offset() + 10.0 * icon.orbit_speed());
        assert!((icon.position() - expected).length() < 1e-6);
        assert_eq!(icon.position().z, ORBIT_DEPTH);
        assert_eq!(icon.emissive(), EMISSIVE_REST);
    }

    #[test]
    fn pointer_lifts_and_lights() {
        let (mut icons, mut r) = icons();
        let icon = &mut icons[0];
        let on_orbit = orbit_position(icon.offset()).truncate();
        icon.update(0.0, on_orbit + Vec2::new(0.0, 2.0));
        // Distance 2 inside radius 4: attraction 0.5.
        assert!((icon.position().z - (ORBIT_DEPTH + 1.0)).abs() < 1e-5);
        assert!((icon.emissive() - 0.35).abs() < 1e-5);

        icon.sync(&mut r);
        let m = r.get(icon.handle()).unwrap().material;
        assert!((m.emissive_intensity - 0.35).abs() < 1e-5);
    }
}
