//! Convenience re-exports: `use backdrop::prelude::*`.

pub use crate::backdrop::{Backdrop, FrameOutcome, LoopState, Visibility};
pub use crate::config::BackdropConfig;
pub use crate::error::BackdropError;
pub use crate::input::{InputEvent, Pointer, Viewport};
pub use crate::math::{Mat4, Quat, Transform, Vec2, Vec3};
pub use crate::render::{HeadlessRenderer, SceneRenderer};
pub use crate::scene::SceneStats;
pub use crate::theme::Theme;

#[cfg(feature = "gpu")]
pub use crate::render::WgpuRenderer;
#[cfg(feature = "gpu")]
pub use crate::run;
