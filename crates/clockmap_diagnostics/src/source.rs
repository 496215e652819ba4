//! Source text registry and byte spans for locating diagnostics.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Opaque identifier for a text registered in a [`SourceMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct FileId(u32);

impl FileId {
    /// Identifier used by [`Span::DUMMY`]; never returned by [`SourceMap::add`].
    pub const DUMMY: FileId = FileId(u32::MAX);

    /// Creates a `FileId` from a raw index.
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A byte range (`start` inclusive, `end` exclusive) within one source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Span {
    /// The text this span points into.
    pub file: FileId,
    /// Byte offset of the first character.
    pub start: u32,
    /// Byte offset one past the last character.
    pub end: u32,
}

impl Span {
    /// A span carrying no location, for issues not tied to source text.
    pub const DUMMY: Span = Span {
        file: FileId::DUMMY,
        start: 0,
        end: 0,
    };

    /// Creates a new span.
    pub fn new(file: FileId, start: u32, end: u32) -> Self {
        Self { file, start, end }
    }

    /// Returns `true` if this is the dummy span.
    pub fn is_dummy(&self) -> bool {
        self.file == FileId::DUMMY
    }
}

/// A span resolved to a 1-indexed line/column position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// The path (or synthetic name) of the source text.
    pub path: PathBuf,
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number in bytes, starting at 1.
    pub col: u32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.path.display(), self.line, self.col)
    }
}

struct SourceText {
    path: PathBuf,
    content: String,
    line_starts: Vec<u32>,
}

/// Owns every text read during a run and resolves [`Span`]s against them.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceText>,
}

impl SourceMap {
    /// Creates an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a text under `path` and returns its [`FileId`].
    pub fn add(&mut self, path: impl Into<PathBuf>, content: String) -> FileId {
        let id = FileId::from_raw(self.files.len() as u32);
        let line_starts = std::iter::once(0)
            .chain(
                content
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        self.files.push(SourceText {
            path: path.into(),
            content,
            line_starts,
        });
        id
    }

    /// Returns the registered text, or `None` for an unknown or dummy id.
    pub fn content(&self, id: FileId) -> Option<&str> {
        self.files.get(id.as_raw() as usize).map(|f| f.content.as_str())
    }

    /// Returns the path a text was registered under.
    pub fn path(&self, id: FileId) -> Option<&Path> {
        self.files.get(id.as_raw() as usize).map(|f| f.path.as_path())
    }

    /// Resolves the start of `span` to a line/column location.
    pub fn locate(&self, span: Span) -> Option<Location> {
        let file = self.files.get(span.file.as_raw() as usize)?;
        let line_idx = match file.line_starts.binary_search(&span.start) {
            Ok(idx) => idx,
            Err(idx) => idx - 1,
        };
        Some(Location {
            path: file.path.clone(),
            line: line_idx as u32 + 1,
            col: span.start - file.line_starts[line_idx] + 1,
        })
    }

    /// Returns the full source line containing the start of `span`.
    pub fn line_text(&self, span: Span) -> Option<&str> {
        let content = self.content(span.file)?;
        let offset = (span.start as usize).min(content.len());
        let start = content[..offset].rfind('\n').map_or(0, |p| p + 1);
        let end = content[offset..]
            .find('\n')
            .map_or(content.len(), |p| offset + p);
        Some(content[start..end].trim_end_matches('\r'))
    }
}
