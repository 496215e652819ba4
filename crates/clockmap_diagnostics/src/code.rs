//! Diagnostic codes with category prefixes for structured issue identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The pipeline stage that produced a diagnostic, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Port extraction issues, prefixed with `P`.
    Port,
    /// Signal classification and domain assignment issues, prefixed with `C`.
    Classify,
    /// Formal configuration patching issues, prefixed with `F`.
    Formal,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Port => 'P',
            Category::Classify => 'C',
            Category::Formal => 'F',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g. `P001`, `C001`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// A declaration has a direction keyword but no recoverable port name.
    pub const MALFORMED_PORT: Self = Self::new(Category::Port, 1);
    /// A bit range could not be evaluated; the port is treated as 1 bit wide.
    pub const NON_NUMERIC_RANGE: Self = Self::new(Category::Port, 2);
    /// A port name was declared twice; the later declaration is skipped.
    pub const DUPLICATE_PORT: Self = Self::new(Category::Port, 3);
    /// The requested top module was not found in the source file.
    pub const MODULE_NOT_FOUND: Self = Self::new(Category::Port, 4);
    /// A data or reset port could not be bound to any clock domain.
    pub const UNASSIGNED_SIGNAL: Self = Self::new(Category::Classify, 1);
    /// The module has no port recognized as a clock.
    pub const NO_CLOCKS: Self = Self::new(Category::Classify, 2);
    /// A directory scan found no source files with recognized extensions.
    pub const EMPTY_FILE_SET: Self = Self::new(Category::Formal, 1);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
