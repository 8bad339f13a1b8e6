//! Error types for the backdrop.

use thiserror::Error;

/// Errors the background can report to its host.
///
/// None of these are fatal to the host: a failed start leaves the background
/// disabled and hidden, and everything else is logged.
#[derive(Debug, Error)]
pub enum BackdropError {
    /// The rendering capability (window, adapter, device or surface) could
    /// not be acquired.
    #[error("rendering capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// The drawing surface failed mid-frame in a way that cannot be recovered
    /// by reconfiguring.
    #[error("surface error: {0}")]
    Surface(String),

    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BackdropError {
    /// Creates a capability error.
    pub fn capability(msg: impl Into<String>) -> Self {
        Self::CapabilityUnavailable(msg.into())
    }

    /// Creates a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
