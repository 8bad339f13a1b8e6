//! # Scene: Entity Collections and the Per-Frame Update
//!
//! [`Scene`] owns every animated entity plus the camera and the random source
//! used for placement and burst jitter. It knows nothing about windows or
//! frame scheduling: [`Scene::advance`] takes the animation time and pointer,
//! updates everything in a fixed order, and pushes the results to a
//! [`SceneRenderer`].
//!
//! ## Update Order
//!
//! ```text
//! camera drift → particles → shapes → wave → node graph → icons → bursts → swarm
//! ```
//!
//! Bursts consume random numbers while they jitter, so the order above is part
//! of what makes a seeded run replay identically.
//!
//! ## Pointer Spread
//!
//! The pointer arrives normalized to `[-1, 1]`. Most entities compare against
//! it scaled by [`POINTER_SPREAD`]; the swarm, spread over a larger volume,
//! uses [`SWARM_SPREAD`].

pub mod burst;
pub mod camera;
pub mod icons;
pub mod network;
pub mod particles;
pub mod shapes;
pub mod swarm;
pub mod wave;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::{BackdropConfig, BurstConfig};
use crate::input::{Pointer, Viewport};
use crate::render::SceneRenderer;
use crate::theme::Theme;

use burst::ParticleBurst;
use camera::Camera;
use icons::OrbitIcon;
use network::NodeGraph;
use particles::ParticleCloud;
use shapes::FloatingShape;
use swarm::InstancedSwarm;
use wave::WaveSurface;

/// World units per normalized pointer unit.
pub const POINTER_SPREAD: f32 = 10.0;
/// World units per normalized pointer unit, for the swarm.
pub const SWARM_SPREAD: f32 = 20.0;
/// Bursts spawn where the click ray crosses this plane.
pub const BURST_PLANE_Z: f32 = 0.0;

/// Entity counts, reported in diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStats {
    pub particles: usize,
    pub shapes: usize,
    pub wave_vertices: usize,
    pub nodes: usize,
    pub connections: usize,
    pub icons: usize,
    pub instances: usize,
    /// Bursts currently alive.
    pub bursts: usize,
    /// Points across all live bursts.
    pub burst_particles: usize,
    pub bursts_spawned: u64,
    pub bursts_retired: u64,
}

pub struct Scene {
    camera: Camera,
    particles: ParticleCloud,
    shapes: Vec<FloatingShape>,
    wave: WaveSurface,
    network: NodeGraph,
    icons: Vec<OrbitIcon>,
    swarm: InstancedSwarm,
    bursts: Vec<ParticleBurst>,
    burst_config: BurstConfig,
    rng: StdRng,
    theme: Theme,
    bursts_spawned: u64,
    bursts_retired: u64,
}

impl Scene {
    /// Create every entity on `renderer`, sized for `viewport`.
    pub fn build(
        config: &BackdropConfig,
        viewport: Viewport,
        theme: Theme,
        renderer: &mut impl SceneRenderer,
    ) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let intensity = config.intensity;

        let particles = ParticleCloud::spawn(config.particle_count(viewport), theme, &mut rng, renderer);
        let shapes = FloatingShape::spawn_all(intensity, &mut rng, renderer);
        let wave = WaveSurface::spawn(intensity, renderer);
        let network = NodeGraph::spawn(&config.layers, intensity, &mut rng, renderer);
        let icons = OrbitIcon::spawn_all(intensity, &mut rng, renderer);
        let swarm = InstancedSwarm::spawn(config.instance_count(viewport), theme, &mut rng, renderer);

        if theme.is_light() {
            for shape in &shapes {
                shape.recolor(theme, renderer);
            }
        }
        renderer.set_clear_color(theme.clear_color());

        log::debug!(
            "Scene built: {} particles, {} nodes, {} connections, {} instances",
            particles.len(),
            network.nodes().len(),
            network.connection_count(),
            swarm.len()
        );

        Self {
            camera: Camera::new(viewport.aspect()),
            particles,
            shapes,
            wave,
            network,
            icons,
            swarm,
            bursts: Vec::new(),
            burst_config: config.burst,
            rng,
            theme,
            bursts_spawned: 0,
            bursts_retired: 0,
        }
    }

    /// Run one update at animation time `t` and push the results to the
    /// renderer.
    pub fn advance(&mut self, t: f32, pointer: Pointer, renderer: &mut impl SceneRenderer) {
        let near = pointer.world(POINTER_SPREAD);

        self.camera.drift_toward(pointer);

        self.particles.update(t, near);
        self.particles.sync(renderer);

        for shape in &mut self.shapes {
            shape.update(t, near);
            shape.sync(renderer);
        }

        self.wave.update(t);
        self.wave.sync(renderer);

        self.network.update(t, near);
        self.network.sync(renderer);

        for icon in &mut self.icons {
            icon.update(t, near);
            icon.sync(renderer);
        }

        self.step_bursts(renderer);

        self.swarm.update(t, pointer.world(SWARM_SPREAD));
        self.swarm.sync(renderer);
    }

    fn step_bursts(&mut self, renderer: &mut impl SceneRenderer) {
        let rng = &mut self.rng;
        let mut retired = 0;
        self.bursts.retain_mut(|burst| {
            if burst.step(rng) {
                burst.sync(renderer);
                true
            } else {
                burst.despawn(renderer);
                retired += 1;
                false
            }
        });
        if retired > 0 {
            self.bursts_retired += retired;
            log::debug!("Retired {retired} burst(s), {} alive", self.bursts.len());
        }
    }

    /// Spawn a burst under a click at window coordinates.
    ///
    /// Returns `false` when the click ray misses the burst plane.
    pub fn spawn_burst(&mut self, x: f32, y: f32, viewport: Viewport, renderer: &mut impl SceneRenderer) -> bool {
        let ndc = viewport.to_ndc(x, y);
        let Some(center) = self.camera.ray_to_plane(ndc, BURST_PLANE_Z) else {
            log::debug!("Click at ({x}, {y}) misses the burst plane");
            return false;
        };
        let burst = ParticleBurst::spawn(
            center,
            self.burst_config.particles,
            self.burst_config.decay,
            &mut self.rng,
            renderer,
        );
        self.bursts.push(burst);
        self.bursts_spawned += 1;
        log::debug!("Burst spawned at ({:.2}, {:.2})", center.x, center.y);
        true
    }

    /// Apply a theme's colours. Visibility is the caller's concern.
    pub fn set_theme(&mut self, theme: Theme, renderer: &mut impl SceneRenderer) {
        self.theme = theme;
        self.particles.recolor(theme, &mut self.rng, renderer);
        for shape in &self.shapes {
            shape.recolor(theme, renderer);
        }
        self.swarm.recolor(theme, renderer);
        renderer.set_clear_color(theme.clear_color());
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.camera.set_aspect(viewport.aspect());
    }

    /// Remove every entity from the renderer. The scene is unusable afterwards.
    pub fn detach(&mut self, renderer: &mut impl SceneRenderer) {
        self.particles.despawn(renderer);
        for shape in &self.shapes {
            shape.despawn(renderer);
        }
        self.wave.despawn(renderer);
        self.network.despawn(renderer);
        for icon in &self.icons {
            icon.despawn(renderer);
        }
        self.swarm.despawn(renderer);
        for burst in self.bursts.drain(..) {
            burst.despawn(renderer);
        }
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            particles: self.particles.len(),
            shapes: self.shapes.len(),
            wave_vertices: self.wave.vertex_count(),
            nodes: self.network.nodes().len(),
            connections: self.network.connection_count(),
            icons: self.icons.len(),
            instances: self.swarm.len(),
            bursts: self.bursts.len(),
            burst_particles: self.bursts.iter().map(ParticleBurst::len).sum(),
            bursts_spawned: self.bursts_spawned,
            bursts_retired: self.bursts_retired,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn particles(&self) -> &ParticleCloud {
        &self.particles
    }

    pub fn shapes(&self) -> &[FloatingShape] {
        &self.shapes
    }

    pub fn wave(&self) -> &WaveSurface {
        &self.wave
    }

    pub fn network(&self) -> &NodeGraph {
        &self.network
    }

    pub fn icons(&self) -> &[OrbitIcon] {
        &self.icons
    }

    pub fn swarm(&self) -> &InstancedSwarm {
        &self.swarm
    }

    pub fn bursts(&self) -> &[ParticleBurst] {
        &self.bursts
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }
}
