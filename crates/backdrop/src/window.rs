//! Window management via winit.
//!
//! Implements [`winit::application::ApplicationHandler`] to host a
//! [`Backdrop`] in a desktop window: window creation, input forwarding,
//! resize, and the self-rescheduling redraw loop.

use std::sync::Arc;

use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::backdrop::{Backdrop, FrameOutcome, Visibility};
use crate::config::BackdropConfig;
use crate::error::BackdropError;
use crate::input::InputEvent;
use crate::render::WgpuRenderer;

/// The application state that winit drives.
struct BackdropApp {
    backdrop: Backdrop<WgpuRenderer>,
    window: Option<Arc<Window>>,
    /// Last known cursor position, in physical pixels.
    cursor: (f32, f32),
    #[cfg(feature = "diagnostics")]
    diag: Option<crate::diag::DiagSender>,
}

impl BackdropApp {
    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for BackdropApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let cfg = &self.backdrop.config().window;
        let attrs = Window::default_attributes()
            .with_title(&cfg.title)
            .with_inner_size(winit::dpi::LogicalSize::new(cfg.width as f64, cfg.height as f64));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Cannot create window: {err}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.backdrop.handle_event(InputEvent::Resized {
            width: size.width.max(1),
            height: size.height.max(1),
        });

        let surface_window = window.clone();
        if let Err(err) = self.backdrop.start(|_| WgpuRenderer::new(surface_window)) {
            // The window stays open; the background just isn't drawn.
            log::warn!("Running without a background: {err}");
        }

        self.window = Some(window);
        self.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Window close requested, exiting.");
                self.backdrop.destroy();
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                if size.width > 0 && size.height > 0 {
                    self.backdrop.handle_event(InputEvent::Resized {
                        width: size.width,
                        height: size.height,
                    });
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                match event.physical_key {
                    PhysicalKey::Code(KeyCode::Escape) => {
                        self.backdrop.destroy();
                        event_loop.exit();
                    }
                    PhysicalKey::Code(KeyCode::KeyT) => {
                        let was_hidden = self.backdrop.visibility() == Visibility::Hidden;
                        let next = self.backdrop.theme().next();
                        self.backdrop.handle_event(InputEvent::ThemeChanged(next));
                        // A hidden loop stopped asking for frames; restart it.
                        if was_hidden && self.backdrop.visibility() == Visibility::Visible {
                            self.request_redraw();
                        }
                    }
                    _ => {}
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
                self.backdrop.handle_event(InputEvent::PointerMoved {
                    x: self.cursor.0,
                    y: self.cursor.1,
                });
            }

            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                let (x, y) = self.cursor;
                self.backdrop.handle_event(InputEvent::Click { x, y });
            }

            WindowEvent::RedrawRequested => match self.backdrop.frame() {
                FrameOutcome::Continue => self.request_redraw(),
                FrameOutcome::Skip | FrameOutcome::Stop => {}
            },

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        #[cfg(feature = "diagnostics")]
        if let Some(diag) = self.diag.as_mut() {
            diag.send(&self.backdrop);
        }
    }
}

/// Open a window and run the background until it is closed.
///
/// Failing to acquire the GPU is not an error here: the window stays open
/// without a background. Errors are returned only when the event loop itself
/// cannot be created or fails.
pub fn run(config: BackdropConfig) -> Result<(), BackdropError> {
    config.validate()?;

    let event_loop = EventLoop::new()
        .map_err(|e| BackdropError::capability(format!("cannot create event loop: {e}")))?;
    event_loop.set_control_flow(ControlFlow::Wait);

    #[cfg(feature = "diagnostics")]
    let diag = crate::diag::DiagSender::new(&config.diagnostics_addr);

    let mut app = BackdropApp {
        backdrop: Backdrop::new(config),
        window: None,
        cursor: (0.0, 0.0),
        #[cfg(feature = "diagnostics")]
        diag,
    };

    event_loop
        .run_app(&mut app)
        .map_err(|e| BackdropError::capability(format!("event loop error: {e}")))
}
