//! `*`-wildcard patterns for signal names and template markers.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A case-sensitive glob pattern where `*` matches any run of characters.
///
/// `*Clock*` matches names containing `Clock`, `*clk` matches names ending
/// in `clk`, `prep*` matches lines starting with `prep`, and `[*]` matches
/// any bracketed section header. A pattern without `*` is an exact match.
///
/// The pattern is compiled once into an anchored regular expression in
/// which every literal run is escaped and every `*` is a lazy capture
/// group, so the text a wildcard covered can be recovered with
/// [`stem`](Self::stem).
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Glob {
    pattern: String,
    regex: Regex,
}

impl Glob {
    /// Compiles a glob from its textual form.
    pub fn new(pattern: impl Into<String>) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join("(.*?)");
        let regex = Regex::new(&format!("(?s)^{body}$"))?;
        Ok(Self { pattern, regex })
    }

    /// Compiles a list of built-in patterns.
    ///
    /// Escaped literals and `(.*?)` groups only fail to compile past the
    /// regex size limit; such a pattern is left out of the list.
    pub fn list(patterns: &[&str]) -> Vec<Self> {
        patterns.iter().filter_map(|p| Self::new(*p).ok()).collect()
    }

    /// Returns the textual form of the pattern.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the pattern matches the whole of `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    /// Returns the text matched by the wildcards, with the literals removed.
    ///
    /// Each wildcard capture is trimmed of `_` and the non-empty pieces are
    /// joined with `_`, so `*Clock*` on `blockClock` yields `block` and
    /// `*_clk_*` on `dma_clk_rx` yields `dma_rx`. An exact pattern yields
    /// an empty stem. Returns `None` when the pattern does not match.
    pub fn stem(&self, text: &str) -> Option<String> {
        let caps = self.regex.captures(text)?;
        let pieces: Vec<&str> = caps
            .iter()
            .skip(1)
            .flatten()
            .map(|m| m.as_str().trim_matches('_'))
            .filter(|s| !s.is_empty())
            .collect();
        Some(pieces.join("_"))
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl Eq for Glob {}

impl Hash for Glob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
    }
}

impl TryFrom<String> for Glob {
    type Error = regex::Error;

    fn try_from(pattern: String) -> Result<Self, Self::Error> {
        Self::new(pattern)
    }
}

impl From<Glob> for String {
    fn from(glob: Glob) -> Self {
        glob.pattern
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Glob({})", self.pattern)
    }
}

impl fmt::Display for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glob(pattern: &str) -> Glob {
        Glob::new(pattern).unwrap()
    }

    #[test]
    fn exact_match() {
        let g = glob("clk");
        assert!(g.matches("clk"));
        assert!(!g.matches("sys_clk"));
    }

    #[test]
    fn contains_match_is_case_sensitive() {
        let g = glob("*Clock*");
        assert!(g.matches("io_blockClock"));
        assert!(g.matches("Clock"));
        assert!(!g.matches("io_blockclock"));
    }

    #[test]
    fn suffix_and_prefix() {
        assert!(glob("*clk").matches("io_hubclk"));
        assert!(!glob("*clk").matches("clk_div"));
        assert!(glob("prep*").matches("prep -top gcd"));
        assert!(!glob("prep*").matches("  prep"));
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let g = glob("[*]");
        assert!(g.matches("[files]"));
        assert!(g.matches("[]"));
        assert!(!g.matches("read -formal a.v"));
        assert!(glob("a.b").matches("a.b"));
        assert!(!glob("a.b").matches("axb"));
        assert!(glob("(x)+*").matches("(x)+y"));
    }

    #[test]
    fn middle_literals_in_order() {
        let g = glob("a*b*c");
        assert!(g.matches("axxbyyc"));
        assert!(!g.matches("acb"));
        assert!(!glob("ab*ba").matches("aba"));
    }

    #[test]
    fn star_matches_everything() {
        assert!(glob("*").matches(""));
        assert!(glob("*").matches("anything"));
        assert!(glob("*").matches("two\nlines"));
    }

    #[test]
    fn stem_of_each_shape() {
        assert_eq!(glob("*Clock*").stem("blockClock").as_deref(), Some("block"));
        assert_eq!(glob("*clk").stem("io_hub_clk").as_deref(), Some("io_hub"));
        assert_eq!(glob("clk_*").stem("clk_sys").as_deref(), Some("sys"));
        assert_eq!(glob("clk").stem("clk").as_deref(), Some(""));
        assert_eq!(glob("*Clock*").stem("ClockClock").as_deref(), Some("Clock"));
    }

    #[test]
    fn stem_of_multi_literal_pattern() {
        assert_eq!(glob("*_clk_*").stem("dma_clk_rx").as_deref(), Some("dma_rx"));
        assert_eq!(glob("a*b*").stem("axb").as_deref(), Some("x"));
    }

    #[test]
    fn stem_requires_a_match() {
        assert!(glob("*clk").stem("clk_en").is_none());
    }

    #[test]
    fn deserializes_from_plain_string() {
        let g: Glob = serde_json::from_str("\"*rst\"").unwrap();
        assert_eq!(g.as_str(), "*rst");
        assert!(g.matches("sys_rst"));
        assert_eq!(serde_json::to_string(&g).unwrap(), "\"*rst\"");
    }

    #[test]
    fn equality_follows_pattern_text() {
        assert_eq!(glob("*rst"), glob("*rst"));
        assert_ne!(glob("*rst"), glob("rst*"));
    }

    #[test]
    fn list_compiles_every_builtin() {
        let globs = Glob::list(&["*Clock*", "*clk", "[*]"]);
        assert_eq!(globs.len(), 3);
        assert_eq!(globs[2].as_str(), "[*]");
    }
}
