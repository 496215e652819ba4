//! Locating a module header and its port list inside a source file.

use crate::extract::{extract_ports, mask_comments, PortExtraction};
use clockmap_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, FileId, Span};

/// The port list of one module header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleHeader<'a> {
    /// Text between the port-list parentheses.
    pub ports: &'a str,
    /// Byte offset of `ports` within the searched source.
    pub offset: usize,
}

/// Finds `module <top> [import ...;] [#(...)] ( ... )` in `source`.
///
/// Comments are ignored while searching. Returns `None` if the module is
/// absent or its port list is unterminated.
pub fn locate_module<'a>(source: &'a str, top: &str) -> Option<ModuleHeader<'a>> {
    let masked = mask_comments(source);
    let bytes = masked.as_bytes();
    let mut search_from = 0;

    while let Some(found) = masked[search_from..].find("module") {
        let kw = search_from + found;
        search_from = kw + "module".len();
        if !is_word_start(bytes, kw) || !is_word_end(bytes, search_from) {
            continue;
        }

        let mut i = skip_ws(bytes, search_from);
        if !masked[i..].starts_with(top) || !is_word_end(bytes, i + top.len()) {
            continue;
        }
        i = skip_ws(bytes, i + top.len());

        // Package imports: `import pkg::*;` before the parameter list.
        while masked[i..].starts_with("import") && is_word_end(bytes, i + "import".len()) {
            i = skip_ws(bytes, masked[i..].find(';')? + i + 1);
        }

        // Parameter port list.
        if bytes.get(i) == Some(&b'#') {
            i = skip_ws(bytes, i + 1);
            if bytes.get(i) != Some(&b'(') {
                return None;
            }
            i = skip_ws(bytes, matching_paren(bytes, i)? + 1);
        }

        if bytes.get(i) != Some(&b'(') {
            // `module top;` has no ports.
            return (bytes.get(i) == Some(&b';')).then_some(ModuleHeader {
                ports: "",
                offset: i,
            });
        }
        let close = matching_paren(bytes, i)?;
        return Some(ModuleHeader {
            ports: &source[i + 1..close],
            offset: i + 1,
        });
    }
    None
}

/// Locates `top` in `source` and extracts its ports.
///
/// Emits `P004` and returns `None` when the module cannot be found.
pub fn extract_module_ports(
    source: &str,
    top: &str,
    file: FileId,
    sink: &DiagnosticSink,
) -> Option<PortExtraction> {
    match locate_module(source, top) {
        Some(header) => {
            tracing::debug!(module = top, offset = header.offset, "located module header");
            Some(extract_ports(header.ports, file, header.offset as u32, sink))
        }
        None => {
            sink.emit(
                Diagnostic::error(
                    DiagnosticCode::MODULE_NOT_FOUND,
                    format!("module `{top}` not found"),
                    Span::new(file, 0, 0),
                )
                .with_help("set `design.top` or pass `--top` with the module name"),
            );
            None
        }
    }
}

fn is_ident(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn is_word_start(bytes: &[u8], at: usize) -> bool {
    at == 0 || !is_ident(bytes[at - 1])
}

fn is_word_end(bytes: &[u8], at: usize) -> bool {
    bytes.get(at).map_or(true, |b| !is_ident(*b))
}

fn skip_ws(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    i
}

/// Index of the `)` closing the `(` at `open`.
fn matching_paren(bytes: &[u8], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, b) in bytes.iter().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
