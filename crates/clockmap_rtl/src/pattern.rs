//! The ordered naming-pattern table driving classification.

use clockmap_common::Glob;

/// Clock and reset name patterns plus the interface prefixes ignored when
/// comparing names. Patterns are evaluated in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternTable {
    /// Patterns identifying clock ports.
    pub clock: Vec<Glob>,
    /// Patterns identifying reset ports.
    pub reset: Vec<Glob>,
    /// Prefixes such as `io_` stripped before structural comparison.
    pub interface_prefixes: Vec<String>,
}

impl PatternTable {
    /// Returns the first clock pattern matching `name`.
    pub fn clock_match(&self, name: &str) -> Option<&Glob> {
        self.clock.iter().find(|g| g.matches(name))
    }

    /// Returns the first reset pattern matching `name`.
    pub fn reset_match(&self, name: &str) -> Option<&Glob> {
        self.reset.iter().find(|g| g.matches(name))
    }

    /// Removes the first listed interface prefix that `name` starts with,
    /// unless that would leave nothing.
    pub fn strip_interface<'a>(&self, name: &'a str) -> &'a str {
        self.interface_prefixes
            .iter()
            .filter(|p| !p.is_empty())
            .find_map(|p| name.strip_prefix(p.as_str()).filter(|rest| !rest.is_empty()))
            .unwrap_or(name)
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        Self {
            clock: Glob::list(&["*Clock*", "*clk"]),
            reset: Glob::list(&["*Reset*", "*rst"]),
            interface_prefixes: vec!["io_".into(), "i_".into(), "o_".into()],
        }
    }
}
