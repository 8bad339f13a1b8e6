//! Configuration: every tunable the background reads at start.
//!
//! [`BackdropConfig`] is plain serde data. Every field has a default, so an
//! empty JSON object (`{}`) is a valid config and a partial file only
//! overrides what it names.
//!
//! ```ignore
//! let config = BackdropConfig::load("backdrop.json")?;
//! let mut backdrop = Backdrop::<HeadlessRenderer>::new(config);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::BackdropError;
use crate::input::Viewport;
use crate::theme::Theme;

/// A count that depends on whether the viewport is below the mobile breakpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveCount {
    pub desktop: usize,
    pub mobile: usize,
}

impl AdaptiveCount {
    pub const fn new(desktop: usize, mobile: usize) -> Self {
        Self { desktop, mobile }
    }

    /// Pick the count for a viewport.
    pub fn for_viewport(&self, viewport: Viewport, breakpoint: u32) -> usize {
        if viewport.is_mobile(breakpoint) {
            self.mobile
        } else {
            self.desktop
        }
    }
}

/// Click burst parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Particles per burst.
    pub particles: usize,
    /// Life lost per frame; a burst starts at life 1.0.
    pub decay: f32,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particles: 20,
            decay: 0.02,
        }
    }
}

/// Window settings used by the winit host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "backdrop".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

/// All tunables for the background.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Overall visual strength in `[0, 1]`; scales resting opacities.
    pub intensity: f32,
    /// Multiplier applied to wall-clock seconds to get animation time.
    pub animation_speed: f32,
    /// Viewport widths below this (pixels) use the mobile counts.
    pub mobile_breakpoint: u32,
    pub particles: AdaptiveCount,
    pub instances: AdaptiveCount,
    pub burst: BurstConfig,
    /// Node counts per graph layer, front to back.
    pub layers: Vec<usize>,
    /// Seed for initial placement and burst jitter. Random when absent.
    pub seed: Option<u64>,
    /// Theme at start.
    pub theme: Theme,
    pub window: WindowConfig,
    /// Where diagnostics snapshots are sent (UDP).
    pub diagnostics_addr: String,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            intensity: 1.0,
            animation_speed: 1.5,
            mobile_breakpoint: 768,
            particles: AdaptiveCount::new(300, 100),
            instances: AdaptiveCount::new(800, 500),
            burst: BurstConfig::default(),
            layers: vec![5, 8, 6, 4],
            seed: None,
            theme: Theme::Dark,
            window: WindowConfig::default(),
            diagnostics_addr: "127.0.0.1:9700".to_string(),
        }
    }
}

impl BackdropConfig {
    /// Parse and validate a config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, BackdropError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BackdropError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, otherwise the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, BackdropError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, BackdropError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builder-style seed override.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject values the animation cannot work with.
    pub fn validate(&self) -> Result<(), BackdropError> {
        if !(0.0..=1.0).contains(&self.intensity) {
            return Err(BackdropError::config(format!(
                "intensity must be within [0, 1], got {}",
                self.intensity
            )));
        }
        if !(self.animation_speed > 0.0) {
            return Err(BackdropError::config(format!(
                "animation_speed must be positive, got {}",
                self.animation_speed
            )));
        }
        if !(self.burst.decay > 0.0) {
            return Err(BackdropError::config(format!(
                "burst.decay must be positive, got {}",
                self.burst.decay
            )));
        }
        if self.layers.is_empty() || self.layers.contains(&0) {
            return Err(BackdropError::config(
                "layers must be non-empty and every layer needs at least one node",
            ));
        }
        Ok(())
    }

    /// Number of particles in the cloud for a viewport.
    pub fn particle_count(&self, viewport: Viewport) -> usize {
        self.particles.for_viewport(viewport, self.mobile_breakpoint)
    }

    /// Number of swarm instances for a viewport.
    pub fn instance_count(&self, viewport: Viewport) -> usize {
        self.instances.for_viewport(viewport, self.mobile_breakpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        let config = BackdropConfig::from_json("{}").unwrap();
        assert_eq!(config, BackdropConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            BackdropConfig::from_json(r#"{ "seed": 7, "burst": { "decay": 0.05 }, "theme": "light" }"#)
                .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.burst.decay, 0.05);
        assert_eq!(config.burst.particles, 20);
        assert_eq!(config.theme, Theme::Light);
        assert_eq!(config.layers, vec![5, 8, 6, 4]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(BackdropConfig::from_json(r#"{ "animation_speed": 0.0 }"#).is_err());
        assert!(BackdropConfig::from_json(r#"{ "burst": { "decay": -1.0 } }"#).is_err());
        assert!(BackdropConfig::from_json(r#"{ "layers": [] }"#).is_err());
        assert!(BackdropConfig::from_json(r#"{ "layers": [3, 0] }"#).is_err());
        assert!(BackdropConfig::from_json(r#"{ "intensity": 1.5 }"#).is_err());
        assert!(BackdropConfig::from_json("not json").is_err());
    }

    #[test]
    fn counts_follow_the_breakpoint() {
        let config = BackdropConfig::default();
        assert_eq!(config.particle_count(Viewport::new(1920, 1080)), 300);
        assert_eq!(config.particle_count(Viewport::new(400, 800)), 100);
        assert_eq!(config.instance_count(Viewport::new(1920, 1080)), 800);
        assert_eq!(config.instance_count(Viewport::new(400, 800)), 500);
    }

    #[test]
    fn json_round_trip() {
        let config = BackdropConfig::default().with_seed(42);
        let text = config.to_json().unwrap();
        assert_eq!(BackdropConfig::from_json(&text).unwrap(), config);
    }
}
