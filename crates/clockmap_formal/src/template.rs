//! Line-oriented template documents.

/// A text document held as opaque lines.
///
/// Lines are split on `\n` only, so `\r` and trailing whitespace stay part
/// of the line and round-trip exactly. Whether the text ended in a newline
/// is remembered separately.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateDocument {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl TemplateDocument {
    /// Splits `text` into lines.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let body = text.strip_suffix('\n');
        Self {
            lines: body.unwrap_or(text).split('\n').map(str::to_string).collect(),
            trailing_newline: body.is_some(),
        }
    }

    /// Builds a document from lines.
    pub fn from_lines(lines: Vec<String>, trailing_newline: bool) -> Self {
        Self {
            lines,
            trailing_newline,
        }
    }

    /// The lines, without terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the rendered text ends in a newline.
    pub fn trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Joins the lines back into text.
    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_preserves_bytes() {
        for text in [
            "",
            "\n",
            "a",
            "a\n",
            "a\n\n",
            "[options]\r\nmode prove\r\n",
            "x  \n\n  y",
        ] {
            assert_eq!(TemplateDocument::parse(text).render(), text, "{text:?}");
        }
    }

    #[test]
    fn carriage_returns_stay_in_lines() {
        let doc = TemplateDocument::parse("[files]\r\nrtl/a.v\r\n");
        assert_eq!(doc.lines(), &["[files]\r", "rtl/a.v\r"]);
        assert!(doc.trailing_newline());
    }

    #[test]
    fn blank_lines_are_kept() {
        let doc = TemplateDocument::parse("a\n\nb\n");
        assert_eq!(doc.lines().len(), 3);
        assert_eq!(doc.lines()[1], "");
    }
}
