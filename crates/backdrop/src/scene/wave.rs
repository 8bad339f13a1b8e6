//! Wave surface: a dense wireframe plane lying flat behind the scene whose
//! height field rolls with time.

use std::f32::consts::FRAC_PI_2;

use crate::math::{Transform, Vec2, Vec3, rgb_hex};
use crate::render::{EntityDesc, EntityHandle, Geometry, Material, SceneRenderer, mesh};
use crate::theme::TEAL;

pub const WAVE_SIZE: f32 = 20.0;
pub const WAVE_SEGMENTS: u32 = 100;
pub const WAVE_DEPTH: f32 = -8.0;

/// Height of the surface at local `(x, y)` and animation time `t`.
pub fn wave_height(x: f32, y: f32, t: f32) -> f32 {
    (x * 0.5 + t * 2.0).sin() * 0.5 + (y * 0.3 + t * 1.5).cos() * 0.3
}

pub struct WaveSurface {
    handle: EntityHandle,
    /// Local XY of every vertex, fixed at creation.
    grid: Vec<Vec2>,
    positions: Vec<Vec3>,
}

impl WaveSurface {
    pub fn spawn(intensity: f32, renderer: &mut impl SceneRenderer) -> Self {
        let grid: Vec<Vec2> = mesh::grid(WAVE_SIZE, WAVE_SIZE, WAVE_SEGMENTS, WAVE_SEGMENTS)
            .positions
            .into_iter()
            .map(|[x, y, _]| Vec2::new(x, y))
            .collect();
        let positions = grid.iter().map(|p| p.extend(0.0)).collect();

        // Lay the plane flat: local +Z (the wave height) points up in world.
        let transform = Transform::from_xyz(0.0, 0.0, WAVE_DEPTH).with_euler(Vec3::new(-FRAC_PI_2, 0.0, 0.0));
        let handle = renderer.create(
            EntityDesc::new(
                "wave",
                Geometry::Grid {
                    width: WAVE_SIZE,
                    height: WAVE_SIZE,
                    segments_x: WAVE_SEGMENTS,
                    segments_y: WAVE_SEGMENTS,
                },
                Material::color(rgb_hex(TEAL))
                    .with_opacity(0.1 + intensity * 0.1)
                    .wireframe(),
            )
            .with_transform(transform),
        );

        Self { handle, grid, positions }
    }

    pub fn update(&mut self, t: f32) {
        for (p, g) in self.positions.iter_mut().zip(&self.grid) {
            p.z = wave_height(g.x, g.y, t);
        }
    }

    pub fn sync(&self, renderer: &mut impl SceneRenderer) {
        renderer.set_positions(self.handle, &self.positions);
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

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;

    #[test]
    fn height_formula() {
        assert_eq!(wave_height(0.0, 0.0, 0.0), 0.3);
        let h = wave_height(1.0, 2.0, 0.5);
        let expected = (0.5_f32 + 1.0).sin() * 0.5 + (0.6_f32 + 0.75).cos() * 0.3;
        assert!((h - expected).abs() < 1e-6);
    }

    #[test]
    fn every_vertex_follows_the_height_field() {
        let mut r = HeadlessRenderer::new(800, 600);
        let mut wave = WaveSurface::spawn(1.0, &mut r);
        assert_eq!(wave.vertex_count(), 101 * 101);

        wave.update(2.25);
        wave.sync(&mut r);
        let stored = &r.get(wave.handle()).unwrap().mesh.positions;
        for (p, s) in wave.positions().iter().zip(stored) {
            assert_eq!(p.z, wave_height(p.x, p.y, 2.25));
            assert_eq!(s[2], p.z);
        }
    }

    #[test]
    fn opacity_scales_with_intensity() {
        let mut r = HeadlessRenderer::new(800, 600);
        let wave = WaveSurface::spawn(0.5, &mut r);
        let material = r.get(wave.handle()).unwrap().material;
        assert!((material.opacity - 0.15).abs() < 1e-6);
        assert!(material.wireframe);
    }
}
