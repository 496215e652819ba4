//! Port extraction from raw port-list text.
//!
//! The extractor works at declaration level only: it strips comments,
//! splits the text at top-level `,`/`;` separators and reads each piece as
//! `[direction] [type keywords] [packed ranges] name [unpacked ranges] [= init]`.
//! A piece without a direction inherits the previous one, so
//! `input a, b` declares two inputs.

use crate::port::{Direction, Port};
use clockmap_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, FileId, Span};
use std::collections::HashSet;

/// Net and data type keywords that may sit between the direction and the name.
const TYPE_KEYWORDS: &[&str] = &[
    "wire", "reg", "logic", "var", "bit", "tri", "uwire", "wand", "wor", "signed", "unsigned",
    "integer",
];

/// The ports recovered from one port list.
#[derive(Debug, Clone, Default)]
pub struct PortExtraction {
    /// Ports in declaration order.
    pub ports: Vec<Port>,
    /// Number of declarations that were skipped (each has a diagnostic).
    pub skipped: usize,
}

/// Extracts ports from `text`, a module's port list.
///
/// `file` and `base` place the text inside a registered source so that
/// spans point into the original file; pass [`FileId::DUMMY`] and `0` for
/// free-standing text. Unusable declarations are skipped and reported
/// through `sink`; extraction itself never fails.
pub fn extract_ports(text: &str, file: FileId, base: u32, sink: &DiagnosticSink) -> PortExtraction {
    let masked = mask_comments(text);
    let mut result = PortExtraction::default();
    let mut seen = HashSet::new();
    let mut current_direction: Option<Direction> = None;
    let mut current_width = 1u32;

    for (start, end) in split_declarations(&masked) {
        let raw = &masked[start..end];
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let lead = raw.len() - raw.trim_start().len();
        let span_start = (start + lead) as u32;
        let span = Span::new(file, base + span_start, base + span_start + trimmed.len() as u32);

        let decl = parse_declaration(trimmed);

        if let Some(dir) = decl.direction {
            current_direction = Some(dir);
        }

        let Some(name) = decl.name else {
            let message = if decl.direction.is_some() {
                format!("declaration `{trimmed}` has a direction but no port name")
            } else {
                format!("unrecognized port declaration `{trimmed}`")
            };
            sink.emit(
                Diagnostic::warning(DiagnosticCode::MALFORMED_PORT, message, span)
                    .with_note("the declaration was skipped"),
            );
            result.skipped += 1;
            continue;
        };

        if decl.interface {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::MALFORMED_PORT,
                    format!("interface port `{name}` has no signal direction"),
                    span,
                )
                .with_note("the declaration was skipped"),
            );
            result.skipped += 1;
            continue;
        }

        let Some(direction) = current_direction else {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::MALFORMED_PORT,
                    format!("port `{name}` has no direction"),
                    span,
                )
                .with_help("declare ports ANSI style, e.g. `input logic [7:0] data`"),
            );
            result.skipped += 1;
            continue;
        };

        if decl.declares_type {
            current_width = 1;
            for range in &decl.packed {
                match range_width(range) {
                    Some(w) => current_width = current_width.saturating_mul(w),
                    None => sink.emit(
                        Diagnostic::note(
                            DiagnosticCode::NON_NUMERIC_RANGE,
                            format!("range `[{range}]` of port `{name}` is not a numeric constant"),
                            span,
                        )
                        .with_note("the range is counted as 1 bit"),
                    ),
                }
            }
        }

        if !seen.insert(name.to_string()) {
            sink.emit(Diagnostic::warning(
                DiagnosticCode::DUPLICATE_PORT,
                format!("port `{name}` is declared more than once"),
                span,
            ));
            result.skipped += 1;
            continue;
        }

        tracing::debug!(port = name, %direction, width = current_width, "extracted port");
        result.ports.push(Port {
            name: name.to_string(),
            direction,
            width: current_width,
            span,
        });
    }

    tracing::debug!(
        ports = result.ports.len(),
        skipped = result.skipped,
        "port extraction finished"
    );
    result
}

/// Replaces `//` and `/* */` comments with spaces, keeping byte offsets and newlines.
pub(crate) fn mask_comments(text: &str) -> String {
    enum State {
        Code,
        Line,
        Block,
    }

    let mut out = String::with_capacity(text.len());
    let mut state = State::Code;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match (c, chars.peek()) {
                ('/', Some('/')) => {
                    out.push(' ');
                    state = State::Line;
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    state = State::Block;
                }
                _ => out.push(c),
            },
            State::Line => {
                if c == '\n' {
                    out.push('\n');
                    state = State::Code;
                } else {
                    push_blank(&mut out, c);
                }
            }
            State::Block => {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    out.push_str("  ");
                    state = State::Code;
                } else {
                    push_blank(&mut out, c);
                }
            }
        }
    }
    out
}

fn push_blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
}

/// Splits at `,` and `;` outside brackets, returning byte ranges.
fn split_declarations(text: &str) -> Vec<(usize, usize)> {
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            ',' | ';' if depth <= 0 => {
                pieces.push((start, i));
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push((start, text.len()));
    pieces
}

/// One comma-separated declaration, syntactically decoded.
#[derive(Debug, Default)]
struct Declaration<'a> {
    direction: Option<Direction>,
    /// True when the piece carries its own direction, type, or range and so
    /// does not inherit the previous width.
    declares_type: bool,
    name: Option<&'a str>,
    packed: Vec<&'a str>,
    /// Set for `interface.modport name` ports, which carry no direction.
    interface: bool,
}

fn parse_declaration(text: &str) -> Declaration<'_> {
    let mut decl = Declaration::default();
    let mut idents: Vec<&str> = Vec::new();
    // Ranges tagged with how many identifiers preceded them.
    let mut ranges: Vec<(&str, usize)> = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        if c.is_ascii_whitespace() {
            i += 1;
        } else if c.is_ascii_alphabetic() || c == b'_' || c == b'\\' {
            let start = i;
            i += 1;
            while i < bytes.len() && is_ident_byte(bytes[i], c == b'\\') {
                i += 1;
            }
            let word = &text[start..i];
            if idents.is_empty() && decl.direction.is_none() && ranges.is_empty() {
                if let Some(dir) = Direction::from_keyword(word) {
                    decl.direction = Some(dir);
                    decl.declares_type = true;
                    continue;
                }
            }
            if TYPE_KEYWORDS.contains(&word) {
                decl.declares_type = true;
            } else {
                idents.push(word);
            }
        } else if c == b'[' {
            let start = i + 1;
            let mut depth = 0;
            while i < bytes.len() {
                match bytes[i] {
                    b'[' => depth += 1,
                    b']' => {
                        depth -= 1;
                        if depth == 0 {
                            break;
                        }
                    }
                    _ => {}
                }
                i += 1;
            }
            let end = i.min(bytes.len());
            ranges.push((text[start..end].trim(), idents.len()));
            i = end + 1;
        } else if c == b'=' {
            break;
        } else if c == b'.' && !idents.is_empty() {
            decl.interface = true;
            i += 1;
        } else {
            i += 1;
        }
    }

    decl.name = idents.last().copied();
    let name_index = idents.len();
    decl.packed = ranges
        .iter()
        .filter(|(_, before)| *before < name_index)
        .map(|(r, _)| *r)
        .collect();
    if !decl.packed.is_empty() || idents.len() > 1 {
        decl.declares_type = true;
    }
    decl
}

fn is_ident_byte(b: u8, escaped: bool) -> bool {
    if escaped {
        !b.is_ascii_whitespace()
    } else {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
    }
}

/// Width of a packed range body such as `7:0` or `WIDTH-1:0`.
fn range_width(range: &str) -> Option<u32> {
    let width = match range.split_once(':') {
        Some((msb, lsb)) => (eval_const(msb)? - eval_const(lsb)?).abs() + 1,
        None => eval_const(range)?,
    };
    u32::try_from(width).ok().filter(|w| *w >= 1)
}

/// Evaluates a sum/difference of decimal literals, e.g. `8-1`.
fn eval_const(expr: &str) -> Option<i64> {
    let expr: String = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut rest = expr.as_str();
    let mut sign = 1i64;
    let mut total = 0i64;
    loop {
        let end = rest.find(['+', '-']).unwrap_or(rest.len());
        let value: i64 = rest[..end].parse().ok()?;
        total = total.checked_add(sign.checked_mul(value)?)?;
        if end == rest.len() {
            return Some(total);
        }
        sign = if rest[end..].starts_with('-') { -1 } else { 1 };
        rest = &rest[end + 1..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clockmap_diagnostics::Severity;

    fn extract(text: &str) -> (PortExtraction, Vec<Diagnostic>) {
        let sink = DiagnosticSink::new();
        let result = extract_ports(text, FileId::DUMMY, 0, &sink);
        (result, sink.take_all())
    }

    fn summary(result: &PortExtraction) -> Vec<(&str, Direction, u32)> {
        result
            .ports
            .iter()
            .map(|p| (p.name.as_str(), p.direction, p.width))
            .collect()
    }

    #[test]
    fn ansi_ports_with_ranges() {
        let (result, diags) = extract(
            "input logic clk,\n input logic [15:0] io_msgIn,\n output wire [0:3] flags",
        );
        assert_eq!(
            summary(&result),
            vec![
                ("clk", Direction::Input, 1),
                ("io_msgIn", Direction::Input, 16),
                ("flags", Direction::Output, 4),
            ]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn direction_carries_across_commas() {
        let (result, _) = extract("input io_blockClock,\n      io_hubClock,\n output q");
        assert_eq!(
            summary(&result),
            vec![
                ("io_blockClock", Direction::Input, 1),
                ("io_hubClock", Direction::Input, 1),
                ("q", Direction::Output, 1),
            ]
        );
    }

    #[test]
    fn continuation_inherits_width() {
        let (result, _) = extract("input [7:0] a, b, input c");
        assert_eq!(
            summary(&result),
            vec![
                ("a", Direction::Input, 8),
                ("b", Direction::Input, 8),
                ("c", Direction::Input, 1),
            ]
        );
    }

    #[test]
    fn comments_are_ignored() {
        let text = "input clk, // main clock, 100 MHz\n /* output ghost, */ output [3:0] led";
        let (result, diags) = extract(text);
        assert_eq!(
            summary(&result),
            vec![("clk", Direction::Input, 1), ("led", Direction::Output, 4)]
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn unpacked_dimensions_and_initialisers_ignored() {
        let (result, _) = extract("input [7:0] mem [0:3], output logic done = 1'b0");
        assert_eq!(
            summary(&result),
            vec![("mem", Direction::Input, 8), ("done", Direction::Output, 1)]
        );
    }

    #[test]
    fn multiple_packed_ranges_multiply() {
        let (result, _) = extract("input logic [3:0][7:0] lanes");
        assert_eq!(result.ports[0].width, 32);
    }

    #[test]
    fn user_type_before_name() {
        let (result, _) = extract("input msg_t payload, inout tri pad");
        assert_eq!(
            summary(&result),
            vec![
                ("payload", Direction::Input, 1),
                ("pad", Direction::Inout, 1)
            ]
        );
    }

    #[test]
    fn arithmetic_range_bounds() {
        let (result, diags) = extract("input [8-1:0] byte_in");
        assert_eq!(result.ports[0].width, 8);
        assert!(diags.is_empty());
    }

    #[test]
    fn parameter_range_reports_note() {
        let (result, diags) = extract("input [WIDTH-1:0] data");
        assert_eq!(result.ports[0].width, 1);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::NON_NUMERIC_RANGE);
        assert_eq!(diags[0].severity, Severity::Note);
    }

    #[test]
    fn direction_without_name_is_skipped() {
        let (result, diags) = extract("input clk,\n input [7:0],\n output q");
        assert_eq!(result.ports.len(), 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::MALFORMED_PORT);
        assert!(diags[0].message.contains("no port name"));
    }

    #[test]
    fn name_without_direction_is_skipped() {
        let (result, diags) = extract("a, b");
        assert!(result.ports.is_empty());
        assert_eq!(result.skipped, 2);
        assert!(diags.iter().all(|d| d.code == DiagnosticCode::MALFORMED_PORT));
    }

    #[test]
    fn interface_ports_do_not_inherit_direction() {
        let (result, diags) = extract("input logic clk,\n axi_if.slave bus,\n output q");
        assert_eq!(
            summary(&result),
            vec![("clk", Direction::Input, 1), ("q", Direction::Output, 1)]
        );
        assert_eq!(result.skipped, 1);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::MALFORMED_PORT);
        assert!(diags[0].message.contains("`bus`"));
    }

    #[test]
    fn duplicate_names_are_skipped() {
        let (result, diags) = extract("input a, output a");
        assert_eq!(result.ports.len(), 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(diags[0].code, DiagnosticCode::DUPLICATE_PORT);
    }

    #[test]
    fn trailing_separator_and_semicolons() {
        let (result, diags) = extract("input a;\noutput b;\n");
        assert_eq!(result.ports.len(), 2);
        assert!(diags.is_empty());
    }

    #[test]
    fn spans_point_at_declarations() {
        let sink = DiagnosticSink::new();
        let file = FileId::from_raw(0);
        let result = extract_ports("input a,\n  output b", file, 100, &sink);
        assert_eq!(result.ports[1].span, Span::new(file, 111, 119));
    }

    #[test]
    fn output_is_deterministic() {
        let text = "input clk, input [3:0] a, output [1:0] b";
        let (first, _) = extract(text);
        let (second, _) = extract(text);
        assert_eq!(first.ports, second.ports);
    }

    #[test]
    fn mask_keeps_offsets() {
        let text = "a /* ü */ b // c\nd";
        let masked = mask_comments(text);
        assert_eq!(masked.len(), text.len());
        assert_eq!(masked.find('b'), text.find('b'));
        assert_eq!(masked.find('d'), text.find('d'));
        assert!(!masked.contains('c'));
    }

    #[test]
    fn eval_const_forms() {
        assert_eq!(eval_const("7"), Some(7));
        assert_eq!(eval_const("16 - 1"), Some(15));
        assert_eq!(eval_const("4+4-1"), Some(7));
        assert_eq!(eval_const("N-1"), None);
        assert_eq!(eval_const(""), None);
    }
}
