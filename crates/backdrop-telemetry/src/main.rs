//! backdrop-telemetry: TUI diagnostics dashboard for a running backdrop.
//!
//! Listens for the JSON snapshots a backdrop host sends over UDP and shows
//! them in a btop-style terminal dashboard using ratatui.
//!
//! Run a host with the `diagnostics` feature (the default), then
//! `cargo run -p backdrop-telemetry [addr]`. The address defaults to
//! `127.0.0.1:9700`, matching `BackdropConfig::diagnostics_addr`.

use std::collections::VecDeque;
use std::io;
use std::net::UdpSocket;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Sparkline};
use serde::Deserialize;

const DEFAULT_ADDR: &str = "127.0.0.1:9700";

// ── Wire types (must match backdrop's JSON format) ──────────────────────

#[derive(Deserialize, Default, Debug)]
#[serde(default)]
struct DiagSnapshot {
    fps: f32,
    delta_ms: f32,
    frame_count: u64,
    elapsed_secs: f32,
    state: String,
    visibility: String,
    disabled: bool,
    theme: String,
    pointer: [f32; 2],
    scene: SceneStats,
    render: Option<RenderStats>,
    logs: Vec<LogEntryInfo>,
}

#[derive(Deserialize, Default, Debug, Clone, Copy)]
#[serde(default)]
struct SceneStats {
    particles: usize,
    shapes: usize,
    wave_vertices: usize,
    nodes: usize,
    connections: usize,
    icons: usize,
    instances: usize,
    bursts: usize,
    burst_particles: usize,
    bursts_spawned: u64,
    bursts_retired: u64,
}

#[derive(Deserialize, Default, Debug, Clone, Copy)]
#[serde(default)]
struct RenderStats {
    entities: usize,
    draw_calls: usize,
    vertices: usize,
    instances: usize,
    frames: u64,
}

#[derive(Deserialize, Debug, Clone)]
struct LogEntryInfo {
    level: String,
    #[allow(dead_code)]
    target: String,
    message: String,
    timestamp_secs: f32,
}

// ── Tabs ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Tab {
    Overview,
    Logs,
}

impl Tab {
    const ALL: [Tab; 2] = [Tab::Overview, Tab::Logs];

    fn label(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Logs => "Logs",
        }
    }

    fn next(self) -> Self {
        match self {
            Tab::Overview => Tab::Logs,
            Tab::Logs => Tab::Overview,
        }
    }
}

// ── Log level filter ────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum LogFilter {
    All,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogFilter {
    fn next(self) -> Self {
        match self {
            LogFilter::All => LogFilter::Debug,
            LogFilter::Debug => LogFilter::Info,
            LogFilter::Info => LogFilter::Warn,
            LogFilter::Warn => LogFilter::Error,
            LogFilter::Error => LogFilter::All,
        }
    }

    fn label(self) -> &'static str {
        match self {
            LogFilter::All => "ALL",
            LogFilter::Debug => "DEBUG+",
            LogFilter::Info => "INFO+",
            LogFilter::Warn => "WARN+",
            LogFilter::Error => "ERROR",
        }
    }

    fn passes(self, level: &str) -> bool {
        match self {
            LogFilter::All => true,
            LogFilter::Debug => level != "TRACE",
            LogFilter::Info => matches!(level, "INFO" | "WARN" | "ERROR"),
            LogFilter::Warn => matches!(level, "WARN" | "ERROR"),
            LogFilter::Error => level == "ERROR",
        }
    }
}

// ── App state ────────────────────────────────────────────────────────────

const HISTORY_CAP: usize = 1200;
const LOG_CAP: usize = 2000;

struct App {
    latest: DiagSnapshot,
    fps_history: VecDeque<u64>,
    delta_history: VecDeque<u64>,
    /// Live burst count per snapshot.
    burst_history: VecDeque<u64>,
    active_tab: Tab,
    paused: bool,
    connected: bool,

    log_entries: Vec<LogEntryInfo>,
    log_filter: LogFilter,
    log_auto_scroll: bool,
    log_scroll_offset: usize,
}

fn push_capped(history: &mut VecDeque<u64>, value: u64) {
    if history.len() >= HISTORY_CAP {
        history.pop_front();
    }
    history.push_back(value);
}

impl App {
    fn new() -> Self {
        Self {
            latest: DiagSnapshot::default(),
            fps_history: VecDeque::with_capacity(HISTORY_CAP),
            delta_history: VecDeque::with_capacity(HISTORY_CAP),
            burst_history: VecDeque::with_capacity(HISTORY_CAP),
            active_tab: Tab::Overview,
            paused: false,
            connected: false,
            log_entries: Vec::new(),
            log_filter: LogFilter::Info,
            log_auto_scroll: true,
            log_scroll_offset: 0,
        }
    }

    fn push_snapshot(&mut self, snap: DiagSnapshot) {
        if self.paused {
            return;
        }

        push_capped(&mut self.fps_history, snap.fps.round().max(0.0) as u64);
        // Microseconds, so sub-millisecond jitter still shows.
        push_capped(
            &mut self.delta_history,
            (snap.delta_ms * 1000.0).round().max(0.0) as u64,
        );
        push_capped(&mut self.burst_history, snap.scene.bursts as u64);

        self.log_entries.extend(snap.logs.iter().cloned());
        if self.log_entries.len() > LOG_CAP {
            let excess = self.log_entries.len() - LOG_CAP;
            self.log_entries.drain(..excess);
        }

        self.latest = snap;
        self.connected = true;
    }

    fn log_counts(&self) -> (usize, usize, usize, usize, usize) {
        let (mut t, mut d, mut i, mut w, mut e) = (0, 0, 0, 0, 0);
        for log in &self.log_entries {
            match log.level.as_str() {
                "TRACE" => t += 1,
                "DEBUG" => d += 1,
                "INFO" => i += 1,
                "WARN" => w += 1,
                "ERROR" => e += 1,
                _ => {}
            }
        }
        (t, d, i, w, e)
    }

    fn filtered_logs(&self) -> Vec<&LogEntryInfo> {
        self.log_entries
            .iter()
            .filter(|e| self.log_filter.passes(&e.level))
            .collect()
    }
}

// ── Main ─────────────────────────────────────────────────────────────────

fn main() -> io::Result<()> {
    let addr = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_ADDR.to_string());
    let recv_socket = UdpSocket::bind(&addr).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("cannot bind {addr} (is another backdrop-telemetry running?): {e}"),
        )
    })?;
    recv_socket.set_nonblocking(true)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let mut buf = [0u8; 65536];

    loop {
        // Drain all pending datagrams.
        while let Ok(n) = recv_socket.recv(&mut buf) {
            if let Ok(snap) = serde_json::from_slice::<DiagSnapshot>(&buf[..n]) {
                app.push_snapshot(snap);
            }
        }

        terminal.draw(|f| ui(f, &app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if handle_key(&mut app, key) {
                    break;
                }
            }
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

// ── Key handling ─────────────────────────────────────────────────────────

/// Returns `true` if the app should quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return true;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return true,
        KeyCode::Char('p') => app.paused = !app.paused,
        KeyCode::Char('l') => app.log_filter = app.log_filter.next(),
        KeyCode::Char('1') => app.active_tab = Tab::Overview,
        KeyCode::Char('2') => app.active_tab = Tab::Logs,
        KeyCode::Tab => app.active_tab = app.active_tab.next(),
        KeyCode::Char('g') if app.active_tab == Tab::Logs => {
            app.log_auto_scroll = !app.log_auto_scroll;
        }
        KeyCode::Up if app.active_tab == Tab::Logs => {
            if app.log_auto_scroll {
                app.log_auto_scroll = false;
                app.log_scroll_offset = app.filtered_logs().len();
            }
            app.log_scroll_offset = app.log_scroll_offset.saturating_sub(1);
        }
        KeyCode::Down if app.active_tab == Tab::Logs => {
            app.log_scroll_offset = app.log_scroll_offset.saturating_add(1);
        }
        _ => {}
    }
    false
}

// ── UI rendering ─────────────────────────────────────────────────────────

fn ui(f: &mut ratatui::Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Length(1), // tab bar
            Constraint::Min(6),    // tab content
            Constraint::Length(3), // render stats
            Constraint::Length(1), // help bar
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_tab_bar(f, app, chunks[1]);
    match app.active_tab {
        Tab::Overview => draw_overview_tab(f, app, chunks[2]),
        Tab::Logs => draw_logs_tab(f, app, chunks[2]),
    }
    draw_render_panel(f, app, chunks[3]);
    draw_help_bar(f, app, chunks[4]);
}

fn draw_header(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let s = &app.latest;
    let (status, status_color) = if app.paused {
        ("PAUSED", Color::Yellow)
    } else if !app.connected {
        ("WAITING", Color::DarkGray)
    } else if s.disabled {
        ("DISABLED", Color::Red)
    } else if s.state != "Running" {
        ("STOPPED", Color::Red)
    } else if s.visibility == "Hidden" {
        ("HIDDEN", Color::Magenta)
    } else {
        ("LIVE", Color::Green)
    };

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);
    let text = Line::from(vec![
        Span::styled(
            format!(" {status} "),
            Style::default().bg(status_color).fg(Color::Black),
        ),
        Span::raw("  "),
        Span::styled("FPS: ", label),
        Span::styled(
            format!("{:.1}", s.fps),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled("Frame: ", label),
        Span::styled(format!("{}", s.frame_count), value),
        Span::raw("  |  "),
        Span::styled("\u{0394}: ", label),
        Span::styled(format!("{:.1}ms", s.delta_ms), value),
        Span::raw("  |  "),
        Span::styled("Up: ", label),
        Span::styled(format_uptime(s.elapsed_secs), value),
        Span::raw("  |  "),
        Span::styled("Theme: ", label),
        Span::styled(s.theme.clone(), value),
    ]);

    let block = Block::default()
        .title(" backdrop-telemetry ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_tab_bar(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for (i, tab) in Tab::ALL.iter().enumerate() {
        let num = format!(" {} ", i + 1);
        let label = format!("{} ", tab.label());
        if *tab == app.active_tab {
            spans.push(Span::styled(
                num,
                Style::default().bg(Color::Cyan).fg(Color::Black).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                label,
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(num, Style::default().fg(Color::DarkGray)));
            spans.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::raw("  "));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Overview Tab ─────────────────────────────────────────────────────────

fn draw_overview_tab(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(4)])
        .split(area);

    draw_sparklines(f, app, chunks[0]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    draw_entity_panel(f, app, bottom[0]);
    draw_burst_panel(f, app, bottom[1]);
}

/// A bordered sparkline with a one-line min/avg/max footer.
fn draw_spark_box(
    f: &mut ratatui::Frame,
    area: Rect,
    title: &str,
    data: &[u64],
    color: Color,
    footer: String,
) {
    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    f.render_widget(block, area);
    if inner.height < 2 {
        return;
    }
    let spark_area = Rect { height: inner.height - 1, ..inner };
    let stats_area = Rect {
        y: inner.y + inner.height - 1,
        height: 1,
        ..inner
    };
    let sparkline = Sparkline::default().data(data).style(Style::default().fg(color));
    f.render_widget(sparkline, spark_area);
    f.render_widget(
        Paragraph::new(Span::styled(footer, Style::default().fg(Color::DarkGray))),
        stats_area,
    );
}

fn draw_sparklines(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let fps_data: Vec<u64> = app.fps_history.iter().copied().collect();
    let (fps_min, fps_avg, fps_max) = stats(&fps_data);
    draw_spark_box(
        f,
        chunks[0],
        "FPS History",
        &fps_data,
        Color::Green,
        format!("min: {fps_min:.0}  avg: {fps_avg:.0}  max: {fps_max:.0}"),
    );

    let delta_data: Vec<u64> = app.delta_history.iter().copied().collect();
    let (d_min, d_avg, d_max) = stats(&delta_data);
    draw_spark_box(
        f,
        chunks[1],
        "Delta Time",
        &delta_data,
        Color::Yellow,
        format!(
            "min: {:.1}ms  avg: {:.1}ms  max: {:.1}ms",
            d_min / 1000.0,
            d_avg / 1000.0,
            d_max / 1000.0
        ),
    );
}

fn draw_entity_panel(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let s = &app.latest.scene;
    let block = Block::default()
        .title(" Scene ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let row = |name: &str, count: usize| {
        Line::from(vec![
            Span::styled(format!("  {name:<14}"), Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{count:>6}"), Style::default().fg(Color::White)),
        ])
    };
    let [px, py] = app.latest.pointer;
    let lines = vec![
        row("Particles", s.particles),
        row("Shapes", s.shapes),
        row("Wave vertices", s.wave_vertices),
        row("Nodes", s.nodes),
        row("Connections", s.connections),
        row("Icons", s.icons),
        row("Instances", s.instances),
        Line::from(vec![
            Span::styled("  Pointer       ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{px:+.2}, {py:+.2}"), Style::default().fg(Color::Cyan)),
        ]),
    ];
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_burst_panel(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let s = &app.latest.scene;
    let burst_data: Vec<u64> = app.burst_history.iter().copied().collect();
    let (_, _, peak) = stats(&burst_data);
    draw_spark_box(
        f,
        area,
        "Bursts",
        &burst_data,
        Color::Magenta,
        format!(
            "live: {} ({} pts)  spawned: {}  retired: {}  peak: {peak:.0}",
            s.bursts, s.burst_particles, s.bursts_spawned, s.bursts_retired
        ),
    );
}

// ── Logs Tab ─────────────────────────────────────────────────────────────

fn draw_logs_tab(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let (t, d, i, w, e) = app.log_counts();
    let scroll_label = if app.log_auto_scroll { "auto" } else { "manual" };

    let block = Block::default()
        .title(format!(
            " Logs [{}]  T:{t} D:{d} I:{i} W:{w} E:{e}  scroll:{scroll_label} ",
            app.log_filter.label(),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let filtered = app.filtered_logs();
    if filtered.is_empty() {
        let text = Span::styled("  No log messages", Style::default().fg(Color::DarkGray));
        f.render_widget(Paragraph::new(text), inner);
        return;
    }

    let visible = inner.height as usize;
    let total = filtered.len();
    let offset = if app.log_auto_scroll {
        total.saturating_sub(visible)
    } else {
        app.log_scroll_offset.min(total.saturating_sub(visible))
    };

    let lines: Vec<Line> = filtered
        .iter()
        .skip(offset)
        .take(visible)
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("  [{:>6.1}s] ", entry.timestamp_secs),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{:<5} ", entry.level),
                    Style::default()
                        .fg(level_color(&entry.level))
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(entry.message.clone(), Style::default().fg(Color::White)),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines), inner);
}

fn level_color(level: &str) -> Color {
    match level {
        "TRACE" => Color::DarkGray,
        "DEBUG" => Color::Gray,
        "INFO" => Color::Cyan,
        "WARN" => Color::Yellow,
        "ERROR" => Color::Red,
        _ => Color::White,
    }
}

// ── Render stats + help bar ──────────────────────────────────────────────

fn draw_render_panel(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Render ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().fg(Color::White);
    let text = if let Some(r) = &app.latest.render {
        Line::from(vec![
            Span::styled("  Entities: ", label),
            Span::styled(format!("{}", r.entities), value),
            Span::raw("  |  "),
            Span::styled("Draw calls: ", label),
            Span::styled(format!("{}", r.draw_calls), value),
            Span::raw("  |  "),
            Span::styled("Vertices: ", label),
            Span::styled(format!("{}", r.vertices), value),
            Span::raw("  |  "),
            Span::styled("Instances: ", label),
            Span::styled(format!("{}", r.instances), value),
            Span::raw("  |  "),
            Span::styled("Frames: ", label),
            Span::styled(format!("{}", r.frames), value),
        ])
    } else {
        Line::from(Span::styled("  No renderer (not started or destroyed)", label))
    };

    f.render_widget(Paragraph::new(text).block(block), area);
}

fn draw_help_bar(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let key = Style::default().fg(Color::Cyan);
    let mut spans = vec![
        Span::styled(" [1-2]", key),
        Span::raw(" tab  "),
        Span::styled("[Tab]", key),
        Span::raw(" next  "),
        Span::styled("[l]", key),
        Span::raw(format!(" log filter ({})  ", app.log_filter.label())),
    ];
    if app.active_tab == Tab::Logs {
        spans.push(Span::styled("[g]", key));
        spans.push(Span::raw(" auto-scroll  "));
        spans.push(Span::styled("[\u{2191}\u{2193}]", key));
        spans.push(Span::raw(" scroll  "));
    }
    spans.push(Span::styled("[p]", key));
    spans.push(Span::raw(" pause  "));
    spans.push(Span::styled("[q]", key));
    spans.push(Span::raw(" quit"));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

// ── Helpers ──────────────────────────────────────────────────────────────

fn stats(data: &[u64]) -> (f64, f64, f64) {
    let (Some(min), Some(max)) = (data.iter().min(), data.iter().max()) else {
        return (0.0, 0.0, 0.0);
    };
    let avg = data.iter().sum::<u64>() as f64 / data.len() as f64;
    (*min as f64, avg, *max as f64)
}

fn format_uptime(secs: f32) -> String {
    let total = secs as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}h{m}m{s}s")
    } else if m > 0 {
        format!("{m}m{s}s")
    } else {
        format!("{secs:.1}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "fps": 59.8, "delta_ms": 16.7, "frame_count": 120, "elapsed_secs": 2.0,
        "state": "Running", "visibility": "Visible", "disabled": false,
        "theme": "dark", "pointer": [0.25, -0.5],
        "scene": {"particles": 300, "shapes": 5, "wave_vertices": 10201,
                  "nodes": 23, "connections": 112, "icons": 5, "instances": 800,
                  "bursts": 2, "burst_particles": 40, "bursts_spawned": 3,
                  "bursts_retired": 1},
        "render": {"entities": 40, "draw_calls": 38, "vertices": 12000,
                   "instances": 800, "frames": 120},
        "logs": [{"level": "INFO", "target": "backdrop", "message": "started",
                  "timestamp_secs": 0.1}]
    }"#;

    #[test]
    fn parses_a_full_snapshot() {
        let snap: DiagSnapshot = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(snap.scene.connections, 112);
        assert_eq!(snap.render.map(|r| r.draw_calls), Some(38));
        assert_eq!(snap.logs.len(), 1);
        assert_eq!(snap.pointer, [0.25, -0.5]);
    }

    #[test]
    fn missing_fields_default() {
        let snap: DiagSnapshot = serde_json::from_str(r#"{"fps": 30.0}"#).unwrap();
        assert_eq!(snap.frame_count, 0);
        assert!(snap.render.is_none());
        assert!(snap.logs.is_empty());
    }

    #[test]
    fn pause_freezes_history() {
        let mut app = App::new();
        app.push_snapshot(serde_json::from_str(SAMPLE).unwrap());
        app.paused = true;
        app.push_snapshot(serde_json::from_str(SAMPLE).unwrap());
        assert_eq!(app.fps_history.len(), 1);
        assert_eq!(app.burst_history.back(), Some(&2));
        assert_eq!(app.log_entries.len(), 1);
        assert_eq!(app.fps_history.back(), Some(&60));
        assert_eq!(app.delta_history.back(), Some(&16_700));
    }

    #[test]
    fn log_filter_cycles_and_filters() {
        let mut filter = LogFilter::Info;
        assert!(filter.passes("WARN"));
        assert!(!filter.passes("DEBUG"));
        for _ in 0..5 {
            filter = filter.next();
        }
        assert_eq!(filter, LogFilter::Info);
        assert!(LogFilter::Error.passes("ERROR"));
        assert!(!LogFilter::Error.passes("WARN"));
    }

    #[test]
    fn keys_toggle_state() {
        let mut app = App::new();
        let press = |c| KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE);
        assert!(!handle_key(&mut app, press('p')));
        assert!(app.paused);
        handle_key(&mut app, press('l'));
        assert_eq!(app.log_filter, LogFilter::Warn);
        handle_key(&mut app, press('2'));
        assert_eq!(app.active_tab, Tab::Logs);
        assert!(handle_key(&mut app, press('q')));
    }

    #[test]
    fn helpers() {
        assert_eq!(stats(&[]), (0.0, 0.0, 0.0));
        assert_eq!(stats(&[1, 2, 3]), (1.0, 2.0, 3.0));
        assert_eq!(format_uptime(75.0), "1m15s");
        assert_eq!(format_uptime(3725.0), "1h2m5s");
        assert_eq!(format_uptime(4.0), "4.0s");
    }
}
