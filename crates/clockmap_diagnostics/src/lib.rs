//! Diagnostic creation, source locations, and terminal rendering.
//!
//! Non-fatal issues found while extracting ports, classifying signals, or
//! scanning source directories are reported as structured [`Diagnostic`]s
//! into a [`DiagnosticSink`] instead of aborting the run. The
//! [`TerminalRenderer`] resolves each diagnostic's [`Span`] through the
//! [`SourceMap`] and prints it rustc style.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod renderer;
pub mod severity;
pub mod sink;
pub mod source;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use renderer::{DiagnosticRenderer, TerminalRenderer};
pub use severity::Severity;
pub use sink::DiagnosticSink;
pub use source::{FileId, Location, SourceMap, Span};
