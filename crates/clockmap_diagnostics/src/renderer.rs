//! Human-readable rendering of diagnostics.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use crate::source::SourceMap;

/// Formats a diagnostic for display.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic, sources: &SourceMap) -> String;
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// warning[P001]: declaration has a direction but no port name
///   --> rtl/Top.sv:4:5
///    |
///  4 |     input [7:0]
///    |     ^^^^^^^^^^^
///    = help: ...
/// ```
pub struct TerminalRenderer {
    /// Whether to wrap the severity header in ANSI color codes.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn header(&self, diag: &Diagnostic) -> String {
        let label = format!("{}[{}]", diag.severity, diag.code);
        if !self.color {
            return label;
        }
        let ansi = match diag.severity {
            Severity::Error => "31",
            Severity::Warning => "33",
            Severity::Note => "36",
        };
        format!("\x1b[1;{ansi}m{label}\x1b[0m")
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic, sources: &SourceMap) -> String {
        let mut out = format!("{}: {}\n", self.header(diag), diag.message);

        if let (Some(loc), Some(text)) = (
            sources.locate(diag.primary_span),
            sources.line_text(diag.primary_span),
        ) {
            let line_num = loc.line.to_string();
            let padding = " ".repeat(line_num.len());
            let text_len = text.len() as u32;
            let start_col = loc.col.min(text_len + 1);
            let span_len = diag.primary_span.end.saturating_sub(diag.primary_span.start);
            // Underline stops at the end of the first line of a multi-line span.
            let carets = span_len.min(text_len + 1 - start_col).max(1) as usize;

            out.push_str(&format!("{padding}--> {loc}\n"));
            out.push_str(&format!("{padding} |\n"));
            out.push_str(&format!("{line_num} | {text}\n"));
            out.push_str(&format!(
                "{padding} | {}{}\n",
                " ".repeat(start_col as usize - 1),
                "^".repeat(carets)
            ));
        }

        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::DiagnosticCode;
    use crate::source::Span;

    #[test]
    fn render_with_location() {
        let mut sources = SourceMap::new();
        let id = sources.add("top.sv", "module top (\n  input [3:0]\n);\n".to_string());
        let span = Span::new(id, 15, 26);
        let diag = Diagnostic::warning(DiagnosticCode::MALFORMED_PORT, "no port name", span);

        let out = TerminalRenderer::new(false).render(&diag, &sources);
        assert!(out.starts_with("warning[P001]: no port name\n"));
        assert!(out.contains("--> top.sv:2:3"));
        assert!(out.contains("2 |   input [3:0]"));
        assert!(out.contains("  ^^^^^^^^^^^"));
    }

    #[test]
    fn render_dummy_span_has_no_location() {
        let sources = SourceMap::new();
        let diag = Diagnostic::warning(DiagnosticCode::EMPTY_FILE_SET, "no sources", Span::DUMMY)
            .with_note("scanned rtl/")
            .with_help("check `design.extensions`");
        let out = TerminalRenderer::new(false).render(&diag, &sources);
        assert!(out.contains("warning[F001]: no sources"));
        assert!(!out.contains("-->"));
        assert!(out.contains("= note: scanned rtl/"));
        assert!(out.contains("= help: check `design.extensions`"));
    }

    #[test]
    fn color_wraps_header() {
        let sources = SourceMap::new();
        let diag = Diagnostic::error(DiagnosticCode::MODULE_NOT_FOUND, "gone", Span::DUMMY);
        let out = TerminalRenderer::new(true).render(&diag, &sources);
        assert!(out.starts_with("\x1b[1;31merror[P004]\x1b[0m: gone"));
    }
}
