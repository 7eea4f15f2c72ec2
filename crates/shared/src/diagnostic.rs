//! Diagnostics channel
//!
//! Misconfiguration and invalid input are reported here instead of being
//! returned to the caller. The caller degrades to a safe default (logged
//! out, request unchanged, transition denied) and the host decides what to
//! do with the report.

use std::borrow::Cow;
use std::sync::{Mutex, PoisonError};

/// A single report: where it came from and what was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Configuration point or operation that produced the report
    pub origin: Cow<'static, str>,
    pub message: Cow<'static, str>,
}

impl Diagnostic {
    pub fn new(
        origin: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            origin: origin.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.origin, self.message)
    }
}

/// Receiver of diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: emits every diagnostic as a `warn` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            origin = %diagnostic.origin,
            message = %diagnostic.message,
            "Diagnostic reported"
        );
    }
}

/// Sink that keeps every report in memory, then forwards to tracing.
///
/// Used by tests and by hosts that surface configuration errors in a UI.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of reports from the given origin
    pub fn count_from(&self, origin: &str) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.origin == origin)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl DiagnosticSink for RecordingSink {
    fn report(&self, diagnostic: Diagnostic) {
        TracingSink.report(diagnostic.clone());
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.report(Diagnostic::new("a", "first"));
        sink.report(Diagnostic::new("b", "second"));
        sink.report(Diagnostic::new("a", "third"));

        let entries = sink.entries();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[1].message, "second");
        assert_eq!(sink.count_from("a"), 2);
        assert_eq!(sink.count_from("c"), 0);
    }

    #[test]
    fn test_display() {
        let d = Diagnostic::new("AuthService.authorize", "bad route");
        assert_eq!(d.to_string(), "AuthService.authorize: bad route");
    }
}
