#![forbid(unsafe_code)]

//! Small helpers shared with other page scripts.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

pub use crate::validation::{FormControl, validate_form};

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").expect("static regex"));
static MOBILE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})(\d{5})(\d{4})").expect("static regex"));

/// Format a Brazilian mobile number as `(DD) DDDDD-DDDD`.
///
/// Non-digits are stripped first. Only the first 11-digit run is formatted;
/// trailing digits are kept as-is and shorter inputs come back as bare digits.
#[must_use]
pub fn format_phone(phone: &str) -> String {
    let digits = NON_DIGIT.replace_all(phone, "");
    MOBILE_NUMBER.replace(&digits, "($1) $2-$3").into_owned()
}

/// Tracing target for lines emitted by [`log`].
pub const LOG_TARGET: &str = "terreiro::page";

/// Severity for the page log helper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Self::Debug),
            "info" | "log" | "" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: {other}")),
        }
    }
}

/// Render a page log line: `[HH:MM:SS] Terreiro: <message>`.
#[must_use]
pub fn log_line(message: &str, time: DateTime<FixedOffset>) -> String {
    format!("[{}] Terreiro: {message}", time.format("%H:%M:%S"))
}

/// Render a log line and mirror it as a tracing event.
pub fn log(level: LogLevel, message: &str, time: DateTime<FixedOffset>) -> String {
    let line = log_line(message, time);
    match level {
        LogLevel::Debug => tracing::debug!(target: LOG_TARGET, "{line}"),
        LogLevel::Info => tracing::info!(target: LOG_TARGET, "{line}"),
        LogLevel::Warn => tracing::warn!(target: LOG_TARGET, "{line}"),
        LogLevel::Error => tracing::error!(target: LOG_TARGET, "{line}"),
    }
    line
}
