//! Structured JSON line logger
//!
//! One log line = one event. Output keys are deterministic: "event"
//! first, "severity" second, remaining fields sorted alphabetically.
//! Writes are synchronous and unbuffered so lines survive a crash.

use std::fmt;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Log severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    /// Parses a level name, case-insensitively.
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "trace" => Some(Self::Trace),
            "info" => Some(Self::Info),
            "warn" => Some(Self::Warn),
            "error" => Some(Self::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

static LEVEL: OnceLock<Severity> = OnceLock::new();

fn level_from_env() -> Option<Severity> {
    std::env::var("FREIGHTDB_LOG")
        .ok()
        .and_then(|v| Severity::parse(&v))
}

fn min_level() -> Severity {
    *LEVEL.get_or_init(|| level_from_env().unwrap_or(Severity::Info))
}

/// Structured logger writing JSON lines to stderr.
///
/// Logs go to stderr so command output on stdout stays parseable.
pub struct Logger;

impl Logger {
    /// Pin the minimum level for this process. The FREIGHTDB_LOG
    /// environment variable wins over `fallback`; the first caller
    /// wins over later ones.
    pub fn init_level(fallback: Severity) {
        let _ = LEVEL.get_or_init(|| level_from_env().unwrap_or(fallback));
    }

    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log an event at the given severity. Fields are emitted in
    /// alphabetical key order.
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        if severity < min_level() {
            return;
        }
        let line = Self::render(severity, event, fields);
        let mut stderr = io::stderr();
        let _ = writeln!(stderr, "{}", line);
        let _ = stderr.flush();
    }

    fn render(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
        let mut output = String::with_capacity(128);
        output.push_str("{\"event\":\"");
        escape_into(&mut output, event);
        output.push_str("\",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        let mut sorted: Vec<_> = fields.iter().collect();
        sorted.sort_by_key(|(k, _)| *k);
        for (key, value) in sorted {
            output.push_str(",\"");
            escape_into(&mut output, key);
            output.push_str("\":\"");
            escape_into(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output
    }
}

fn escape_into(output: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            c if (c as u32) < 0x20 => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => output.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_render_sorted() {
        let line = Logger::render(
            Severity::Info,
            "ingest_complete",
            &[("zeta", "1"), ("alpha", "2")],
        );
        assert_eq!(
            line,
            r#"{"event":"ingest_complete","severity":"INFO","alpha":"2","zeta":"1"}"#
        );
    }

    #[test]
    fn test_render_is_valid_json() {
        let line = Logger::render(Severity::Warn, "odd \"event\"", &[("path", "a\\b\nc")]);
        let parsed: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed["severity"], "WARN");
        assert_eq!(parsed["path"], "a\\b\nc");
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("info"), Some(Severity::Info));
        assert_eq!(Severity::parse("WARN"), Some(Severity::Warn));
        assert_eq!(Severity::parse("verbose"), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
    }
}
