//! Idempotent regeneration of the managed sections of a template.
//!
//! The patcher is a three-state line scanner. In `Copy` it passes lines
//! through until a managed marker appears, then emits the marker and the
//! generated body and switches to `Skip`. In `Skip` it drops the previous
//! body until a closing line, which is handed back to `Copy` unchanged.
//! Generated lines never match a closing pattern, so a second run finds
//! exactly the boundaries the first run wrote.

use crate::error::PatchError;
use crate::fileset::FileSet;
use crate::template::TemplateDocument;
use clockmap_common::Glob;

/// Markers and rendering options for one template format.
///
/// Defaults fit SymbiYosys `.sby` files: generated `read -formal` lines go
/// under `[script]` up to the `prep` command, file paths go under `[files]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchSpec {
    /// Header of the section receiving read commands.
    pub read_marker: String,
    /// Header of the section receiving file paths.
    pub files_marker: String,
    /// Lines ending the generated part of the read section.
    pub read_closing: Vec<Glob>,
    /// Lines ending the generated part of the files section.
    pub files_closing: Vec<Glob>,
    /// Command prefix of each generated read line.
    pub read_command: String,
    /// Lines always emitted after the generated read lines.
    pub aux_reads: Vec<String>,
    /// Directory prefix of each file entry.
    pub file_prefix: String,
    /// Whether the end of the document may close the files section.
    pub files_closing_at_eof: bool,
}

impl Default for PatchSpec {
    fn default() -> Self {
        Self {
            read_marker: "[script]".to_string(),
            files_marker: "[files]".to_string(),
            read_closing: Glob::list(&["prep*", "[*]"]),
            files_closing: Glob::list(&["[*]"]),
            read_command: "read -formal".to_string(),
            aux_reads: Vec::new(),
            file_prefix: "rtl".to_string(),
            files_closing_at_eof: true,
        }
    }
}

impl PatchSpec {
    /// The generated body of the read section.
    pub fn read_lines(&self, files: &FileSet) -> Vec<String> {
        files
            .names()
            .iter()
            .map(|name| format!("{} {name}", self.read_command))
            .chain(self.aux_reads.iter().cloned())
            .collect()
    }

    /// The generated body of the files section, ending in a blank separator.
    pub fn file_lines(&self, files: &FileSet) -> Vec<String> {
        let prefix = self.file_prefix.trim_end_matches('/');
        files
            .names()
            .iter()
            .map(|name| {
                if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}/{name}")
                }
            })
            .chain(std::iter::once(String::new()))
            .collect()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum Section {
    Read,
    Files,
}

impl Section {
    fn name(self) -> &'static str {
        match self {
            Section::Read => "read",
            Section::Files => "files",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Copy,
    Skip(Section),
}

/// Replaces the bodies of the read and files sections of `template` with
/// lines generated from `files`. Every other line is copied unchanged.
///
/// Only the first occurrence of each marker is managed. Fails without
/// producing output if a marker is absent, if the read section is never
/// closed, or if a generated line would match a closing pattern.
pub fn patch(
    template: &TemplateDocument,
    files: &FileSet,
    spec: &PatchSpec,
) -> Result<TemplateDocument, PatchError> {
    let read_body = spec.read_lines(files);
    let files_body = spec.file_lines(files);
    check_generated(&read_body, Section::Read, spec)?;
    check_generated(&files_body, Section::Files, spec)?;

    let mut out: Vec<String> = Vec::with_capacity(template.lines().len() + files.len() * 2);
    let mut state = State::Copy;
    let mut read_done = false;
    let mut files_done = false;

    for line in template.lines() {
        let key = line.trim_end();

        if let State::Skip(section) = state {
            if closes(section, key, spec) {
                state = State::Copy;
            } else {
                continue;
            }
        }

        if !read_done && key == spec.read_marker {
            out.push(line.clone());
            out.extend(read_body.iter().cloned());
            read_done = true;
            state = State::Skip(Section::Read);
        } else if !files_done && key == spec.files_marker {
            out.push(line.clone());
            out.extend(files_body.iter().cloned());
            files_done = true;
            state = State::Skip(Section::Files);
        } else {
            out.push(line.clone());
        }
    }

    let total = template.lines().len();
    let missing = |marker: &str| PatchError::TemplateMarkerMissing {
        marker: marker.to_string(),
        line_reached: total,
    };
    if !read_done {
        return Err(missing(&spec.read_marker));
    }
    if !files_done {
        return Err(missing(&spec.files_marker));
    }

    let mut trailing_newline = template.trailing_newline();
    match state {
        State::Copy => {}
        State::Skip(Section::Files) if spec.files_closing_at_eof => {
            // The blank separator is the last line; keep it terminated.
            trailing_newline = true;
        }
        State::Skip(section) => {
            let closing = match section {
                Section::Read => &spec.read_closing,
                Section::Files => &spec.files_closing,
            };
            let expected: Vec<&str> = closing.iter().map(Glob::as_str).collect();
            return Err(missing(&expected.join(" | ")));
        }
    }

    tracing::debug!(
        files = files.len(),
        lines_in = total,
        lines_out = out.len(),
        "patched template"
    );
    Ok(TemplateDocument::from_lines(out, trailing_newline))
}

/// Whether `key` ends the body of `section`.
///
/// The other managed marker always closes a section, even when no
/// closing pattern matches it.
fn closes(section: Section, key: &str, spec: &PatchSpec) -> bool {
    let (closing, other_marker) = match section {
        Section::Read => (&spec.read_closing, &spec.files_marker),
        Section::Files => (&spec.files_closing, &spec.read_marker),
    };
    key == other_marker || closing.iter().any(|g| g.matches(key))
}

fn check_generated(lines: &[String], section: Section, spec: &PatchSpec) -> Result<(), PatchError> {
    let closing = match section {
        Section::Read => &spec.read_closing,
        Section::Files => &spec.files_closing,
    };
    for line in lines {
        let key = line.trim_end();
        let hit = closing
            .iter()
            .find(|g| g.matches(key))
            .map(|g| g.as_str())
            .or_else(|| {
                [&spec.read_marker, &spec.files_marker]
                    .into_iter()
                    .find(|m| key == m.as_str())
                    .map(String::as_str)
            });
        if let Some(marker) = hit {
            return Err(PatchError::GeneratedCollision {
                line: line.clone(),
                marker: marker.to_string(),
                section: section.name(),
            });
        }
    }
    Ok(())
}
