//! Structured diagnostic messages.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use crate::source::Span;
use serde::{Deserialize, Serialize};

/// A structured diagnostic with a code, a message and an optional source span.
///
/// Every non-fatal issue of the pipeline (skipped declarations, unbound
/// signals, empty directory scans) is reported as one of these so the caller
/// can show it next to the best-effort output.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The code identifying the kind of issue.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// Where in the source the issue was detected.
    pub primary_span: Span,
    /// Explanatory footnotes (`= note: ...`).
    pub notes: Vec<String>,
    /// Actionable suggestions (`= help: ...`).
    pub help: Vec<String>,
}

impl Diagnostic {
    fn with_severity(
        severity: Severity,
        code: DiagnosticCode,
        message: impl Into<String>,
        span: Span,
    ) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            primary_span: span,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Error, code, message, span)
    }

    /// Creates a warning diagnostic.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Warning, code, message, span)
    }

    /// Creates a note diagnostic.
    pub fn note(code: DiagnosticCode, message: impl Into<String>, span: Span) -> Self {
        Self::with_severity(Severity::Note, code, message, span)
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Adds a help message to this diagnostic.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_warning() {
        let diag = Diagnostic::warning(
            DiagnosticCode::UNASSIGNED_SIGNAL,
            "signal `io_msgIn` has no clock domain",
            Span::DUMMY,
        );
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code.to_string(), "C001");
    }

    #[test]
    fn builder_methods() {
        let diag = Diagnostic::note(DiagnosticCode::NON_NUMERIC_RANGE, "range", Span::DUMMY)
            .with_note("width assumed to be 1")
            .with_help("use numeric bounds");
        assert_eq!(diag.severity, Severity::Note);
        assert_eq!(diag.notes, vec!["width assumed to be 1"]);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn serializes_to_json() {
        let diag = Diagnostic::error(DiagnosticCode::MODULE_NOT_FOUND, "missing", Span::DUMMY);
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"severity\":\"error\""));
        assert!(json.contains("\"message\":\"missing\""));
    }
}
