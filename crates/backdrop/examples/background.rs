//! Background: the full animated scene in a window.
//!
//! Move the mouse to pull shapes and light up nodes, click for bursts, press
//! `T` to cycle dark → light → monochrome, Escape to quit.
//!
//! ```text
//! cargo run --example background [config.json]
//! ```

use std::path::PathBuf;

use backdrop::prelude::*;

fn main() -> Result<(), BackdropError> {
    #[cfg(feature = "diagnostics")]
    backdrop::diag::init_logger();
    #[cfg(not(feature = "diagnostics"))]
    env_logger::init();

    let path = std::env::args().nth(1).map(PathBuf::from);
    let config = BackdropConfig::load_or_default(path.as_deref())?;

    run(config)
}
