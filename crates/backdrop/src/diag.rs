//! Diagnostics sender: ships real-time metrics to `backdrop-telemetry` over UDP.
//!
//! Enabled by the `diagnostics` feature flag. The host owns a [`DiagSender`]
//! and calls [`DiagSender::send`] once per event-loop turn; the sender
//! throttles itself to 10 Hz, serializes a JSON [`DiagSnapshot`] and fires it
//! at `BackdropConfig::diagnostics_addr`.
//!
//! Log records are captured by [`init_logger`] into a ring buffer and drained
//! into each snapshot, so the dashboard shows them alongside the counters.

use std::collections::VecDeque;
use std::net::UdpSocket;
use std::sync::{Mutex, OnceLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::backdrop::{Backdrop, LoopState, Visibility};
use crate::render::{RenderStats, SceneRenderer};
use crate::scene::SceneStats;

const SEND_INTERVAL: Duration = Duration::from_millis(100);
const LOG_RING_CAPACITY: usize = 500;
const LOGS_PER_SNAPSHOT: usize = 50;

// ── DiagSender ───────────────────────────────────────────────────────────

/// Owns the outbound UDP socket and throttling state.
pub struct DiagSender {
    socket: UdpSocket,
    last_send: Option<Instant>,
}

impl DiagSender {
    /// Bind an ephemeral local port and connect it to `addr`.
    ///
    /// Diagnostics are optional: any socket failure is logged and yields
    /// `None`.
    pub fn new(addr: &str) -> Option<Self> {
        let socket = match UdpSocket::bind("127.0.0.1:0")
            .and_then(|s| s.connect(addr).map(|()| s))
            .and_then(|s| s.set_nonblocking(true).map(|()| s))
        {
            Ok(socket) => socket,
            Err(err) => {
                log::warn!("Diagnostics disabled, cannot reach {addr}: {err}");
                return None;
            }
        };
        log::debug!("Diagnostics sending to {addr}");
        Some(Self {
            socket,
            last_send: None,
        })
    }

    /// Send a snapshot of `backdrop` unless one went out within the last
    /// 100 ms. Returns whether a datagram was sent.
    pub fn send<R: SceneRenderer>(&mut self, backdrop: &Backdrop<R>) -> bool {
        let now = Instant::now();
        if let Some(last) = self.last_send {
            if now.duration_since(last) < SEND_INTERVAL {
                return false;
            }
        }
        self.last_send = Some(now);

        let snapshot = DiagSnapshot::capture(backdrop, drain_captured_logs(LOGS_PER_SNAPSHOT));
        // Fire-and-forget: nobody may be listening.
        match serde_json::to_vec(&snapshot) {
            Ok(json) => self.socket.send(&json).is_ok(),
            Err(_) => false,
        }
    }
}

// ── Snapshot (wire format) ──────────────────────────────────────────────

/// One diagnostics datagram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagSnapshot {
    pub fps: f32,
    pub delta_ms: f32,
    pub frame_count: u64,
    pub elapsed_secs: f32,
    pub state: LoopState,
    pub visibility: Visibility,
    pub disabled: bool,
    pub theme: String,
    pub pointer: [f32; 2],
    pub scene: SceneStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub logs: Vec<LogEntry>,
}

impl DiagSnapshot {
    pub fn capture<R: SceneRenderer>(backdrop: &Backdrop<R>, logs: Vec<LogEntry>) -> Self {
        let time = backdrop.time();
        Self {
            fps: time.fps(),
            delta_ms: time.delta_secs() * 1000.0,
            frame_count: time.frame_count(),
            elapsed_secs: time.elapsed_secs(),
            state: backdrop.state(),
            visibility: backdrop.visibility(),
            disabled: backdrop.is_disabled(),
            theme: backdrop.theme().to_string(),
            pointer: backdrop.pointer().as_vec2().to_array(),
            scene: backdrop.stats(),
            render: backdrop.renderer().map(|r| r.stats()),
            logs,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: String,
    pub target: String,
    pub message: String,
    pub timestamp_secs: f32,
}

// ── Log Capture ──────────────────────────────────────────────────────────

/// Fixed-capacity FIFO of captured records; the oldest entry is dropped when
/// full.
struct LogRing {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl LogRing {
    const fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    fn push(&mut self, entry: LogEntry) {
        if self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    fn drain(&mut self, max: usize) -> Vec<LogEntry> {
        let n = self.entries.len().min(max);
        self.entries.drain(..n).collect()
    }
}

static LOG_RING: Mutex<LogRing> = Mutex::new(LogRing::new(LOG_RING_CAPACITY));
static LOG_START: OnceLock<Instant> = OnceLock::new();

/// Captures records into [`LOG_RING`] and delegates to env_logger for stderr.
struct DiagLogger {
    inner: env_logger::Logger,
}

impl log::Log for DiagLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.inner.enabled(metadata) || metadata.level() <= log::Level::Info
    }

    fn log(&self, record: &log::Record) {
        let to_stderr = self.inner.enabled(record.metadata());
        if to_stderr {
            self.inner.log(record);
        }
        if !to_stderr && record.level() > log::Level::Info {
            return;
        }

        let timestamp_secs = LOG_START
            .get()
            .map_or(0.0, |start| start.elapsed().as_secs_f32());
        if let Ok(mut ring) = LOG_RING.lock() {
            ring.push(LogEntry {
                level: record.level().to_string(),
                target: record.target().to_string(),
                message: record.args().to_string(),
                timestamp_secs,
            });
        }
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

static DIAG_LOGGER: OnceLock<DiagLogger> = OnceLock::new();

/// Install the capturing logger. Honors `RUST_LOG` for stderr output while
/// always capturing `info` and above for the dashboard.
///
/// Call early, before anything logs. If a logger is already installed,
/// capture is disabled and a warning goes to stderr.
pub fn init_logger() {
    LOG_START.get_or_init(Instant::now);

    let inner = env_logger::Builder::new().parse_default_env().build();
    let max_level = inner.filter();
    let logger = DIAG_LOGGER.get_or_init(|| DiagLogger { inner });

    if log::set_logger(logger).is_err() {
        eprintln!("[backdrop] Warning: a logger is already set. Log capture disabled.");
        return;
    }
    log::set_max_level(max_level.max(log::LevelFilter::Info));
}

/// Drain up to `max` captured log entries, oldest first.
pub fn drain_captured_logs(max: usize) -> Vec<LogEntry> {
    match LOG_RING.lock() {
        Ok(mut ring) => ring.drain(max),
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BackdropConfig;
    use crate::render::HeadlessRenderer;

    fn entry(message: &str) -> LogEntry {
        LogEntry {
            level: "INFO".into(),
            target: "test".into(),
            message: message.into(),
            timestamp_secs: 0.0,
        }
    }

    #[test]
    fn ring_drops_oldest_when_full() {
        let mut ring = LogRing::new(3);
        for i in 0..5 {
            ring.push(entry(&i.to_string()));
        }
        let drained: Vec<_> = ring.drain(10).into_iter().map(|e| e.message).collect();
        assert_eq!(drained, ["2", "3", "4"]);
    }

    #[test]
    fn ring_drain_respects_max() {
        let mut ring = LogRing::new(10);
        for i in 0..4 {
            ring.push(entry(&i.to_string()));
        }
        assert_eq!(ring.drain(3).len(), 3);
        assert_eq!(ring.drain(3).len(), 1);
        assert!(ring.drain(3).is_empty());
    }

    #[test]
    fn snapshot_reflects_running_backdrop() {
        let mut backdrop = Backdrop::new(BackdropConfig::default().with_seed(3));
        backdrop
            .start(|vp| Ok(HeadlessRenderer::new(vp.width, vp.height)))
            .unwrap();
        backdrop.frame_at(Duration::from_millis(16));

        let snapshot = DiagSnapshot::capture(&backdrop, Vec::new());
        assert_eq!(snapshot.state, LoopState::Running);
        assert_eq!(snapshot.theme, "dark");
        assert_eq!(snapshot.scene.particles, 300);
        assert_eq!(snapshot.render.map(|r| r.frames), Some(1));

        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(!json.contains("\"logs\""));
        let back: DiagSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn snapshot_after_destroy_has_no_render_stats() {
        let mut backdrop = Backdrop::new(BackdropConfig::default().with_seed(3));
        backdrop
            .start(|vp| Ok(HeadlessRenderer::new(vp.width, vp.height)))
            .unwrap();
        backdrop.destroy();
        let snapshot = DiagSnapshot::capture(&backdrop, vec![entry("bye")]);
        assert_eq!(snapshot.state, LoopState::Stopped);
        assert!(snapshot.render.is_none());
        assert_eq!(snapshot.scene, SceneStats::default());
        assert_eq!(snapshot.logs.len(), 1);
    }

    #[test]
    fn sender_throttles_to_ten_hertz() {
        // Nothing listens on the target; sends still succeed for UDP.
        let Some(mut sender) = DiagSender::new("127.0.0.1:9") else {
            return;
        };
        let backdrop: Backdrop<HeadlessRenderer> = Backdrop::new(BackdropConfig::default());
        sender.send(&backdrop);
        assert!(!sender.send(&backdrop));
    }
}
