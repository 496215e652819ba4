//! RTL source file sets discovered by directory scan.

use crate::error::ScanError;
use clockmap_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Span};
use std::path::Path;

/// Source file names sorted lexicographically by basename, without duplicates.
///
/// Scan order never matters: the set is sorted on construction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FileSet {
    names: Vec<String>,
}

impl FileSet {
    /// Builds a set from file names in any order.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();
        Self { names }
    }

    /// Lists the files in `dir` (non-recursive) whose extension is one of
    /// `extensions`, given without the leading dot.
    ///
    /// An empty result is valid; it is reported as `F001`. Entries whose
    /// names are not valid UTF-8 are skipped.
    pub fn scan(dir: &Path, extensions: &[String], sink: &DiagnosticSink) -> Result<Self, ScanError> {
        let io_err = |source| ScanError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let recognized = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|ext| extensions.iter().any(|x| x == ext));
            if !recognized {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => tracing::warn!(?name, "skipping source file with non UTF-8 name"),
            }
        }

        let set = Self::new(names);
        tracing::debug!(dir = %dir.display(), files = set.len(), "scanned source directory");
        if set.is_empty() {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::EMPTY_FILE_SET,
                    format!("no source files found in `{}`", dir.display()),
                    Span::DUMMY,
                )
                .with_note(format!("recognized extensions: {}", extensions.join(", ")))
                .with_help("the managed template sections will be left empty"),
            );
        }
        Ok(set)
    }

    /// File names in sorted order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the set holds no files.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exts() -> Vec<String> {
        vec!["v".to_string(), "sv".to_string()]
    }

    #[test]
    fn sorted_regardless_of_input_order() {
        let set = FileSet::new(["b.sv", "a.v", "c.sv"]);
        assert_eq!(set.names(), &["a.v", "b.sv", "c.sv"]);
    }

    #[test]
    fn duplicates_collapse() {
        let set = FileSet::new(["a.v", "a.v"]);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn scan_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.sv", "a.v", "notes.txt", "b.sv", "Makefile"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.sv")).unwrap();
        let sink = DiagnosticSink::new();
        let set = FileSet::scan(dir.path(), &exts(), &sink).unwrap();
        assert_eq!(set.names(), &["a.v", "b.sv", "c.sv"]);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn empty_scan_warns() {
        let dir = tempfile::tempdir().unwrap();
        let sink = DiagnosticSink::new();
        let set = FileSet::scan(dir.path(), &exts(), &sink).unwrap();
        assert!(set.is_empty());
        let diags = sink.take_all();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::EMPTY_FILE_SET);
        assert!(!sink.has_errors());
    }

    #[test]
    fn missing_directory_errors() {
        let sink = DiagnosticSink::new();
        let err = FileSet::scan(Path::new("/nonexistent/rtl"), &exts(), &sink).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/rtl"));
    }
}
