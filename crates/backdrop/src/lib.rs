//! # Backdrop: Interactive Animated Scene Background
//!
//! A decorative 3D background that keeps running behind a host application:
//! a drifting particle cloud, wireframe shapes, a procedural wave surface, a
//! layered node graph, orbiting icons, an instanced swarm of boxes and
//! short-lived particle bursts spawned by clicks.
//!
//! The [`Backdrop`](backdrop::Backdrop) value owns every entity and advances
//! them once per frame from elapsed time and pointer position, then hands the
//! scene to a [`SceneRenderer`](render::SceneRenderer). The renderer is a
//! trait so the same loop runs on the GPU ([`WgpuRenderer`](render::WgpuRenderer),
//! `gpu` feature) or fully in memory ([`HeadlessRenderer`](render::HeadlessRenderer)).
//!
//! Start with `use backdrop::prelude::*` and call [`run`] for a window, or
//! drive a [`Backdrop`](backdrop::Backdrop) yourself.

pub mod backdrop;
pub mod config;
pub mod error;
pub mod input;
pub mod math;
pub mod prelude;
pub mod render;
pub mod scene;
pub mod theme;
pub mod time;

#[cfg(feature = "gpu")]
pub(crate) mod window;

#[cfg(feature = "diagnostics")]
pub mod diag;

#[cfg(feature = "gpu")]
pub use window::run;
