#![forbid(unsafe_code)]

//! Tracing layer that forwards events to the browser console.
//!
//! Each event becomes one console line, routed to the console method matching
//! its level. Lines from the page log helper (target
//! [`LOG_TARGET`](terreiro_core::utils::LOG_TARGET)) already carry their own
//! prefix and are forwarded as-is, unless the sink already receives them
//! directly through [`page_log`]. No timestamps are added: the console
//! stamps lines itself and `std::time` is unavailable on `wasm32`.
//!
//! # Quick Start
//!
//! ```
//! use terreiro_web::console::{BrowserConsoleLayer, MemorySink};
//! use tracing_subscriber::prelude::*;
//!
//! let sink = MemorySink::default();
//! let subscriber = tracing_subscriber::registry().with(BrowserConsoleLayer::new(sink.clone()));
//! tracing::subscriber::with_default(subscriber, || tracing::info!("ready"));
//! assert_eq!(sink.lines().len(), 1);
//! ```

use std::fmt::{self, Write as FmtWrite};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, FixedOffset};
use terreiro_core::utils::{self, LOG_TARGET, LogLevel};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

// ============================================================================
// Sinks
// ============================================================================

/// Destination for formatted lines.
pub trait ConsoleSink: Send + Sync + 'static {
    fn emit(&self, level: Level, line: &str);
}

/// Sink that keeps lines in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<(Level, String)>>>,
}

impl MemorySink {
    /// Snapshot of everything emitted so far.
    #[must_use]
    pub fn lines(&self) -> Vec<(Level, String)> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ConsoleSink for MemorySink {
    fn emit(&self, level: Level, line: &str) {
        let mut lines = match self.lines.lock() {
            Ok(l) => l,
            Err(poisoned) => poisoned.into_inner(),
        };
        lines.push((level, line.to_string()));
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// What goes into a console line.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Most verbose level forwarded. Default: `DEBUG`.
    pub max_level: Level,
    /// Show the tracing target. Default: true.
    pub show_target: bool,
    /// Show structured fields beyond `message`. Default: true.
    pub show_fields: bool,
    /// Forward page log lines (target `terreiro::page`). Default: true.
    pub forward_page_lines: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_level: Level::DEBUG,
            show_target: true,
            show_fields: true,
            forward_page_lines: true,
        }
    }
}

// ============================================================================
// Event Visitor
// ============================================================================

#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = strip_debug_quotes(&format!("{value:?}"));
        if field.name() == "message" {
            self.message = Some(rendered);
        } else {
            self.fields.push((field.name().to_string(), rendered));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.fields.push((field.name().to_string(), value.to_string()));
        }
    }
}

fn strip_debug_quotes(s: &str) -> String {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

// ============================================================================
// BrowserConsoleLayer
// ============================================================================

/// A `tracing_subscriber::Layer` writing one line per event to a
/// [`ConsoleSink`].
pub struct BrowserConsoleLayer<S> {
    sink: S,
    config: ConsoleConfig,
}

impl<S: ConsoleSink> BrowserConsoleLayer<S> {
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, ConsoleConfig::default())
    }

    pub fn with_config(sink: S, config: ConsoleConfig) -> Self {
        Self { sink, config }
    }

    /// Builder: most verbose level forwarded.
    #[must_use]
    pub fn max_level(mut self, level: Level) -> Self {
        self.config.max_level = level;
        self
    }

    /// Builder: set whether to show the target module.
    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.config.show_target = show;
        self
    }

    /// Builder: set whether to show structured fields.
    #[must_use]
    pub fn show_fields(mut self, show: bool) -> Self {
        self.config.show_fields = show;
        self
    }

    /// Builder: set whether page log lines are forwarded. Turn this off when
    /// the same sink is written through [`page_log`].
    #[must_use]
    pub fn forward_page_lines(mut self, forward: bool) -> Self {
        self.config.forward_page_lines = forward;
        self
    }

    fn format(&self, event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);
        let message = visitor.message.unwrap_or_default();

        if metadata.target() == LOG_TARGET {
            return message;
        }

        let mut line = String::new();
        if self.config.show_target {
            let _ = write!(line, "{}: ", metadata.target());
        }
        line.push_str(&message);
        if self.config.show_fields {
            for (k, v) in &visitor.fields {
                let _ = write!(line, " {k}={v}");
            }
        }
        line
    }
}

impl<S, Sub> Layer<Sub> for BrowserConsoleLayer<S>
where
    S: ConsoleSink,
    Sub: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        let level = *event.metadata().level();
        // `Level` orders verbose levels as greater.
        if level > self.config.max_level {
            return;
        }
        if !self.config.forward_page_lines && event.metadata().target() == LOG_TARGET {
            return;
        }
        let line = self.format(event);
        self.sink.emit(level, &line);
    }
}

// ============================================================================
// Page log
// ============================================================================

/// Console level for a page log level.
#[must_use]
pub const fn console_level(level: LogLevel) -> Level {
    match level {
        LogLevel::Debug => Level::DEBUG,
        LogLevel::Info => Level::INFO,
        LogLevel::Warn => Level::WARN,
        LogLevel::Error => Level::ERROR,
    }
}

/// Write a page log line straight to `sink` and mirror it as a tracing event.
///
/// The direct write does not depend on which subscriber is installed.
pub fn page_log<S: ConsoleSink>(
    sink: &S,
    level: LogLevel,
    message: &str,
    time: DateTime<FixedOffset>,
) -> String {
    let line = utils::log(level, message, time);
    sink.emit(console_level(level), &line);
    line
}

// ============================================================================
// Tests
// ============================================================================
