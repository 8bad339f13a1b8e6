//! Headless: drive the scene without a GPU and print what it does.
//!
//! Sweeps the pointer across the viewport in a circle, clicks every second
//! and prints a JSON line of scene counts once per simulated second. With
//! `--realtime` each frame sleeps for 16 ms and, under the `diagnostics`
//! feature, snapshots go to `backdrop-telemetry`.
//!
//! ```text
//! cargo run --example headless -- [seconds] [--realtime]
//! ```

use std::time::Duration;

use backdrop::prelude::*;

const FPS: u32 = 60;

fn main() -> Result<(), BackdropError> {
    #[cfg(feature = "diagnostics")]
    backdrop::diag::init_logger();
    #[cfg(not(feature = "diagnostics"))]
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let realtime = args.iter().any(|a| a == "--realtime");
    let seconds: u32 = args
        .iter()
        .find_map(|a| a.parse().ok())
        .unwrap_or(10);

    let config = BackdropConfig::default().with_seed(7);
    #[cfg(feature = "diagnostics")]
    let mut diag = backdrop::diag::DiagSender::new(&config.diagnostics_addr);

    let mut backdrop = Backdrop::new(config);
    backdrop.start(|vp| Ok(HeadlessRenderer::new(vp.width, vp.height)))?;
    let viewport = backdrop.viewport();
    let (cx, cy) = (viewport.width as f32 / 2.0, viewport.height as f32 / 2.0);

    for frame in 0..seconds * FPS {
        let t = frame as f32 / FPS as f32;
        let x = cx + cx * 0.8 * (t * 0.7).cos();
        let y = cy + cy * 0.8 * (t * 0.7).sin();
        backdrop.handle_event(InputEvent::PointerMoved { x, y });
        if frame % FPS == 0 {
            backdrop.handle_event(InputEvent::Click { x, y });
        }

        let outcome = backdrop.frame_at(Duration::from_secs_f32(t));
        if outcome == FrameOutcome::Stop {
            break;
        }

        if frame % FPS == FPS - 1 {
            println!("{}", serde_json::to_string(&backdrop.stats())?);
        }

        if realtime {
            #[cfg(feature = "diagnostics")]
            if let Some(diag) = diag.as_mut() {
                diag.send(&backdrop);
            }
            std::thread::sleep(Duration::from_millis(16));
        }
    }

    if let Some(renderer) = backdrop.renderer() {
        log::info!("Renderer: {:?}", renderer.stats());
    }
    backdrop.destroy();
    Ok(())
}
