//! Diagnostic sink consumed by the game session.
//!
//! The engine reports status changes (check, mate, draws, rejected moves,
//! opening-book hits) as append-only messages with a severity. The default
//! sink forwards them to `tracing`; `MemorySink` additionally keeps
//! timestamped entries so hosts and tests can inspect them.

use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warn,
    Error,
    Success,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Success => "SUCCESS",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub at: DateTime<Utc>,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] [{}] {}",
            self.at.format("%Y-%m-%d %H:%M:%S"),
            self.severity,
            self.message
        )
    }
}

pub trait DiagnosticSink: Send {
    fn record(&mut self, severity: Severity, message: &str);
}

/// Forwards every diagnostic to the `tracing` subscriber installed by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&mut self, severity: Severity, message: &str) {
        emit(severity, message);
    }
}

/// Keeps every diagnostic in memory and also forwards it to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Vec<Diagnostic>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn contains(&self, severity: Severity, needle: &str) -> bool {
        self.entries
            .iter()
            .any(|d| d.severity == severity && d.message.contains(needle))
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&mut self, severity: Severity, message: &str) {
        emit(severity, message);
        self.entries.push(Diagnostic {
            at: Utc::now(),
            severity,
            message: message.to_owned(),
        });
    }
}

/// Shares one `MemorySink` between the session and an observer.
impl DiagnosticSink for std::sync::Arc<std::sync::Mutex<MemorySink>> {
    fn record(&mut self, severity: Severity, message: &str) {
        match self.lock() {
            Ok(mut sink) => sink.record(severity, message),
            Err(poisoned) => poisoned.into_inner().record(severity, message),
        }
    }
}

fn emit(severity: Severity, message: &str) {
    match severity {
        Severity::Info => tracing::info!(target: "sloe_chess::game", "{message}"),
        Severity::Success => tracing::info!(target: "sloe_chess::game", outcome = true, "{message}"),
        Severity::Warn => tracing::warn!(target: "sloe_chess::game", "{message}"),
        Severity::Error => tracing::error!(target: "sloe_chess::game", "{message}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{DiagnosticSink, MemorySink, Severity};

    #[test]
    fn memory_sink_keeps_entries_in_order() {
        let mut sink = MemorySink::new();
        sink.record(Severity::Warn, "White is in check!");
        sink.record(Severity::Success, "Black wins by checkmate!");

        assert_eq!(sink.entries().len(), 2);
        assert_eq!(sink.entries()[0].severity, Severity::Warn);
        assert!(sink.contains(Severity::Success, "checkmate"));
        assert!(!sink.contains(Severity::Error, "checkmate"));
    }

    #[test]
    fn diagnostic_display_includes_severity_label() {
        let mut sink = MemorySink::new();
        sink.record(Severity::Error, "Invalid move attempted");
        let line = sink.entries()[0].to_string();
        assert!(line.contains("[ERROR] Invalid move attempted"));
    }
}
