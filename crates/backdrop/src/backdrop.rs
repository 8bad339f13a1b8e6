//! # Backdrop: The Scene Simulation Loop
//!
//! [`Backdrop`] is the single value a host owns. It holds every piece of
//! mutable state (clock, pointer, theme, viewport, scene, renderer) and moves
//! through a small state machine:
//!
//! ```text
//!            start(acquire) ok
//!  Stopped ─────────────────────▶ Running ──┐
//!     ▲  │                          │       │ frame() → Continue
//!     │  │ start(acquire) err       │       ◀─┘
//!     │  └─▶ (Stopped, Hidden,      │
//!     │       disabled)             │ destroy() / render error
//!     └─────────────────────────────┘
//! ```
//!
//! Visibility is orthogonal to the loop state. A hidden background (the
//! monochrome theme) keeps its entities alive but [`frame`](Backdrop::frame)
//! returns [`FrameOutcome::Skip`] without touching them. A destroyed one has
//! released everything and returns [`FrameOutcome::Stop`].
//!
//! ## Frame Scheduling
//!
//! The loop never schedules itself. The host calls `frame()` from its own
//! redraw callback and asks for another redraw only on `Continue`, so a
//! stopped loop simply stops being called.
//!
//! ## Input
//!
//! [`handle_event`](Backdrop::handle_event) only writes plain fields; the
//! next frame observes them. Clicks are the exception that proves the rule:
//! the burst is created immediately so it starts fading on the next frame.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::input::{InputEvent, Pointer, Viewport};
use crate::render::SceneRenderer;
use crate::scene::{Scene, SceneStats};
use crate::theme::Theme;
use crate::time::Time;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LoopState {
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// What the host should do after a frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// A frame was drawn; schedule the next one.
    Continue,
    /// Hidden: nothing drawn, but the loop is alive. Schedule again once
    /// visible.
    Skip,
    /// The loop is stopped; don't schedule again.
    Stop,
}

pub struct Backdrop<R: SceneRenderer> {
    config: BackdropConfig,
    state: LoopState,
    visibility: Visibility,
    theme: Theme,
    pointer: Pointer,
    viewport: Viewport,
    time: Time,
    scene: Option<Scene>,
    renderer: Option<R>,
    /// Set when the rendering capability could not be acquired.
    disabled: bool,
}

impl<R: SceneRenderer> Backdrop<R> {
    /// An idle loop. Nothing is created until [`start`](Self::start).
    pub fn new(config: BackdropConfig) -> Self {
        let theme = config.theme;
        let viewport = Viewport::new(config.window.width, config.window.height);
        Self {
            config,
            state: LoopState::Stopped,
            visibility: visibility_for(theme),
            theme,
            pointer: Pointer::default(),
            viewport,
            time: Time::new(),
            scene: None,
            renderer: None,
            disabled: false,
        }
    }

    /// Override the initial viewport (before `start`).
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Acquire the rendering capability and build the scene.
    ///
    /// The config is validated first. On failure (bad config or missing
    /// capability) the error is logged and returned, the background is marked
    /// hidden and disabled, and the loop stays stopped. The host carries on.
    pub fn start<F>(&mut self, acquire: F) -> Result<(), BackdropError>
    where
        F: FnOnce(Viewport) -> Result<R, BackdropError>,
    {
        if self.state == LoopState::Running {
            log::warn!("Backdrop already running; start ignored");
            return Ok(());
        }

        let acquired = self.config.validate().and_then(|()| acquire(self.viewport));
        let mut renderer = match acquired {
            Ok(renderer) => renderer,
            Err(err) => {
                log::error!("Background disabled: {err}");
                self.disabled = true;
                self.visibility = Visibility::Hidden;
                return Err(err);
            }
        };

        renderer.resize(self.viewport.width, self.viewport.height);
        let scene = Scene::build(&self.config, self.viewport, self.theme, &mut renderer);
        self.scene = Some(scene);
        self.renderer = Some(renderer);
        self.disabled = false;
        self.visibility = visibility_for(self.theme);
        self.time.reset();
        self.state = LoopState::Running;
        log::info!(
            "Backdrop started ({}x{}, theme {})",
            self.viewport.width,
            self.viewport.height,
            self.theme
        );
        Ok(())
    }

    /// One frame at wall-clock time.
    pub fn frame(&mut self) -> FrameOutcome {
        if let Some(outcome) = self.gate() {
            return outcome;
        }
        self.time.update();
        self.draw()
    }

    /// One frame at an explicit elapsed time since start, for deterministic
    /// replay.
    pub fn frame_at(&mut self, elapsed: Duration) -> FrameOutcome {
        if let Some(outcome) = self.gate() {
            return outcome;
        }
        self.time.advance_to(elapsed);
        self.draw()
    }

    fn gate(&self) -> Option<FrameOutcome> {
        if self.state != LoopState::Running {
            Some(FrameOutcome::Stop)
        } else if self.visibility == Visibility::Hidden {
            Some(FrameOutcome::Skip)
        } else {
            None
        }
    }

    fn draw(&mut self) -> FrameOutcome {
        let t = self.time.elapsed_secs() * self.config.animation_speed;
        let (Some(scene), Some(renderer)) = (self.scene.as_mut(), self.renderer.as_mut()) else {
            return FrameOutcome::Stop;
        };

        scene.advance(t, self.pointer, renderer);
        if let Err(err) = renderer.render(scene.camera()) {
            log::error!("Render failed, tearing the background down: {err}");
            self.destroy();
            return FrameOutcome::Stop;
        }
        FrameOutcome::Continue
    }

    pub fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } => {
                self.pointer = Pointer::from_window(x, y, self.viewport);
            }
            InputEvent::Click { x, y } => {
                // A hidden scene does not advance, so a burst would never fade.
                if self.gate().is_some() {
                    return;
                }
                if let (Some(scene), Some(renderer)) = (self.scene.as_mut(), self.renderer.as_mut()) {
                    scene.spawn_burst(x, y, self.viewport, renderer);
                }
            }
            InputEvent::Resized { width, height } => {
                self.viewport = Viewport::new(width, height);
                if let Some(scene) = self.scene.as_mut() {
                    scene.resize(self.viewport);
                }
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.resize(width, height);
                }
            }
            InputEvent::ThemeChanged(theme) => self.set_theme(theme),
        }
    }

    /// Switch theme. Dark and light recolour the scene; monochrome hides it.
    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        if !self.disabled {
            self.visibility = visibility_for(theme);
        }
        if theme.shows_background() {
            if let (Some(scene), Some(renderer)) = (self.scene.as_mut(), self.renderer.as_mut()) {
                scene.set_theme(theme, renderer);
            }
        }
        log::info!("Theme set to {theme} ({:?})", self.visibility);
    }

    /// Remove every entity, release the renderer and stop. Safe to call more
    /// than once.
    pub fn destroy(&mut self) {
        if self.scene.is_none() && self.renderer.is_none() {
            log::debug!("Backdrop already destroyed");
            self.state = LoopState::Stopped;
            return;
        }
        if let Some(mut renderer) = self.renderer.take() {
            if let Some(mut scene) = self.scene.take() {
                scene.detach(&mut renderer);
            }
            renderer.clear();
        }
        self.scene = None;
        self.state = LoopState::Stopped;
        log::info!("Backdrop destroyed after {} frames", self.time.frame_count());
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    /// Entity counts; all zero once destroyed.
    pub fn stats(&self) -> SceneStats {
        self.scene.as_ref().map(Scene::stats).unwrap_or_default()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }
}

fn visibility_for(theme: Theme) -> Visibility {
    if theme.shows_background() {
        Visibility::Visible
    } else {
        Visibility::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::HeadlessRenderer;

    fn running() -> Backdrop<HeadlessRenderer> {
        let mut backdrop = Backdrop::new(BackdropConfig::default().with_seed(1));
        backdrop
            .start(|vp| Ok(HeadlessRenderer::new(vp.width, vp.height)))
            .unwrap();
        backdrop
    }

    #[test]
    fn starts_stopped_and_visible() {
        let backdrop: Backdrop<HeadlessRenderer> = Backdrop::new(BackdropConfig::default());
        assert_eq!(backdrop.state(), LoopState::Stopped);
        assert_eq!(backdrop.visibility(), Visibility::Visible);
        assert!(backdrop.scene().is_none());
    }

    #[test]
    fn frame_before_start_stops() {
        let mut backdrop: Backdrop<HeadlessRenderer> = Backdrop::new(BackdropConfig::default());
        assert_eq!(backdrop.frame(), FrameOutcome::Stop);
    }

    #[test]
    fn second_start_is_ignored() {
        let mut backdrop = running();
        let mut called = false;
        let result = backdrop.start(|_| {
            called = true;
            Ok(HeadlessRenderer::new(1, 1))
        });
        assert!(result.is_ok());
        assert!(!called);
    }

    #[test]
    fn pointer_is_normalized() {
        let mut backdrop = running();
        backdrop.handle_event(InputEvent::PointerMoved { x: 1280.0, y: 0.0 });
        assert_eq!(backdrop.pointer(), Pointer::new(1.0, 1.0));
    }

    #[test]
    fn resize_reaches_camera_and_renderer() {
        let mut backdrop = running();
        backdrop.handle_event(InputEvent::Resized { width: 1000, height: 500 });
        assert_eq!(backdrop.renderer().unwrap().size(), (1000, 500));
        assert_eq!(backdrop.scene().unwrap().camera().aspect, 2.0);
    }

    #[test]
    fn render_failure_tears_down() {
        let mut backdrop = Backdrop::new(BackdropConfig::default().with_seed(1));
        backdrop
            .start(|vp| Ok(HeadlessRenderer::new(vp.width, vp.height).failing_at(3)))
            .unwrap();
        assert_eq!(backdrop.frame_at(Duration::from_millis(16)), FrameOutcome::Continue);
        assert_eq!(backdrop.frame_at(Duration::from_millis(32)), FrameOutcome::Continue);
        assert_eq!(backdrop.frame_at(Duration::from_millis(48)), FrameOutcome::Stop);
        assert_eq!(backdrop.state(), LoopState::Stopped);
        assert!(backdrop.renderer().is_none());
    }
}
