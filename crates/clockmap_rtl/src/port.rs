//! Port records produced by the extractor.

use clockmap_diagnostics::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The I/O direction of a module port.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `input`
    Input,
    /// `output`
    Output,
    /// `inout`
    Inout,
}

impl Direction {
    /// Parses a direction keyword.
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "input" => Some(Direction::Input),
            "output" => Some(Direction::Output),
            "inout" => Some(Direction::Inout),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Input => write!(f, "input"),
            Direction::Output => write!(f, "output"),
            Direction::Inout => write!(f, "inout"),
        }
    }
}

/// One declared port of a module.
///
/// Names are unique within a module; the extractor skips duplicates.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Port {
    /// The port identifier.
    pub name: String,
    /// The declared direction.
    pub direction: Direction,
    /// Bit width, at least 1.
    pub width: u32,
    /// Where the declaration was found.
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(Direction::from_keyword("input"), Some(Direction::Input));
        assert_eq!(Direction::from_keyword("inout"), Some(Direction::Inout));
        assert_eq!(Direction::from_keyword("wire"), None);
    }

    #[test]
    fn display_matches_keyword() {
        for dir in [Direction::Input, Direction::Output, Direction::Inout] {
            assert_eq!(Direction::from_keyword(&dir.to_string()), Some(dir));
        }
    }
}
