//! Error types for template patching and source scanning.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal conditions of a template patch. No output is produced when one occurs.
#[derive(Debug, Error)]
pub enum PatchError {
    /// A required marker line never appeared.
    #[error("template marker `{marker}` not found (scan reached line {line_reached})")]
    TemplateMarkerMissing {
        /// The marker, or the closing patterns, that were expected.
        marker: String,
        /// Number of template lines scanned before giving up.
        line_reached: usize,
    },
    /// A generated line would be mistaken for a marker on the next run.
    #[error("generated line `{line}` in the {section} section matches marker `{marker}`")]
    GeneratedCollision {
        /// The offending generated line.
        line: String,
        /// The marker or closing pattern it matches.
        marker: String,
        /// `read` or `files`.
        section: &'static str,
    },
}

/// Errors raised while listing a source directory.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The directory could not be read.
    #[error("cannot read source directory `{}`: {source}", path.display())]
    Io {
        /// The directory being scanned.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
