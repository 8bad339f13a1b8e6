//! Input events fed in by the host.
//!
//! The host forwards four streams: pointer movement, pointer clicks, viewport
//! resizes and theme changes. Handlers only write plain fields on the
//! [`Backdrop`](crate::backdrop::Backdrop); the next frame observes them.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;
use crate::theme::Theme;

/// One event from the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer moved to window coordinates (pixels, origin top-left).
    PointerMoved { x: f32, y: f32 },
    /// Primary button clicked at window coordinates.
    Click { x: f32, y: f32 },
    /// Drawing surface resized to the given size in pixels.
    Resized { width: u32, height: u32 },
    /// The host switched theme.
    ThemeChanged(Theme),
}

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height, never dividing by zero.
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }

    /// `true` when narrower than the mobile breakpoint; entity counts shrink.
    pub fn is_mobile(&self, breakpoint: u32) -> bool {
        self.width < breakpoint
    }

    /// Map window coordinates to normalized device coordinates (`[-1, 1]`,
    /// y up).
    pub fn to_ndc(&self, x: f32, y: f32) -> Vec2 {
        let w = self.width.max(1) as f32;
        let h = self.height.max(1) as f32;
        Vec2::new((x / w) * 2.0 - 1.0, -((y / h) * 2.0 - 1.0))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// Pointer position in normalized coordinates (`[-1, 1]` on both axes, y up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pointer {
    pub x: f32,
    pub y: f32,
}

impl Pointer {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Pointer from window coordinates.
    pub fn from_window(x: f32, y: f32, viewport: Viewport) -> Self {
        let ndc = viewport.to_ndc(x, y);
        Self { x: ndc.x, y: ndc.y }
    }

    /// World-space XY the pointer maps to at the given spread (10 for most
    /// entities, 20 for the swarm).
    pub fn world(self, spread: f32) -> Vec2 {
        Vec2::new(self.x * spread, self.y * spread)
    }

    pub fn as_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_corners_map_to_ndc() {
        let vp = Viewport::new(800, 600);
        assert_eq!(Pointer::from_window(0.0, 0.0, vp), Pointer::new(-1.0, 1.0));
        assert_eq!(Pointer::from_window(800.0, 600.0, vp), Pointer::new(1.0, -1.0));
        assert_eq!(Pointer::from_window(400.0, 300.0, vp), Pointer::new(0.0, 0.0));
    }

    #[test]
    fn mobile_breakpoint_is_exclusive() {
        assert!(Viewport::new(767, 1000).is_mobile(768));
        assert!(!Viewport::new(768, 1000).is_mobile(768));
    }

    #[test]
    fn zero_sized_viewport_is_safe() {
        let vp = Viewport::new(0, 0);
        assert_eq!(vp.aspect(), 1.0);
        let ndc = vp.to_ndc(0.0, 0.0);
        assert!(ndc.x.is_finite() && ndc.y.is_finite());
    }

    #[test]
    fn world_scaling() {
        let p = Pointer::new(0.5, -0.25);
        assert_eq!(p.world(10.0), Vec2::new(5.0, -2.5));
        assert_eq!(p.world(20.0), Vec2::new(10.0, -5.0));
    }
}
