//! Time values in nanoseconds with reproducible text rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A duration in nanoseconds, used for clock periods, uncertainty and I/O delays.
///
/// Display always renders at least one decimal digit (`10.0`, `2.5`, `0.15`)
/// so that generated constraint files are byte-stable across runs.
#[derive(Clone, Copy, PartialEq, PartialOrd, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nanoseconds(f64);

impl Nanoseconds {
    /// Creates a new value from a raw nanosecond count.
    pub fn new(ns: f64) -> Self {
        Self(ns)
    }

    /// Returns the raw nanosecond count.
    pub fn value(self) -> f64 {
        self.0
    }

    /// Scales this duration by `factor`.
    pub fn scale(self, factor: f64) -> Self {
        Self(self.0 * factor)
    }

    /// Rounds to one decimal place (half away from zero).
    pub fn round_tenth(self) -> Self {
        Self((self.0 * 10.0).round() / 10.0)
    }

    /// Returns the equivalent frequency in MHz, or 0 for a non-positive period.
    pub fn as_mhz(self) -> f64 {
        if self.0 > 0.0 {
            1000.0 / self.0
        } else {
            0.0
        }
    }
}

impl fmt::Display for Nanoseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format!("{}", self.0);
        if self.0.is_finite() && !text.contains('.') {
            write!(f, "{text}.0")
        } else {
            f.write_str(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_whole_number_keeps_decimal() {
        assert_eq!(Nanoseconds::new(10.0).to_string(), "10.0");
        assert_eq!(Nanoseconds::new(0.0).to_string(), "0.0");
    }

    #[test]
    fn display_fraction_is_shortest_form() {
        assert_eq!(Nanoseconds::new(2.5).to_string(), "2.5");
        assert_eq!(Nanoseconds::new(0.15).to_string(), "0.15");
    }

    #[test]
    fn round_tenth_removes_float_noise() {
        let delay = Nanoseconds::new(10.0).scale(0.3).round_tenth();
        assert_eq!(delay.to_string(), "3.0");
        let delay = Nanoseconds::new(8.0).scale(0.3).round_tenth();
        assert_eq!(delay.to_string(), "2.4");
    }

    #[test]
    fn round_tenth_half_away_from_zero() {
        assert_eq!(Nanoseconds::new(1.25).round_tenth().to_string(), "1.3");
    }

    #[test]
    fn mhz_conversion() {
        assert!((Nanoseconds::new(10.0).as_mhz() - 100.0).abs() < 1e-9);
        assert_eq!(Nanoseconds::new(0.0).as_mhz(), 0.0);
    }

    #[test]
    fn serde_is_transparent() {
        let json = serde_json::to_string(&Nanoseconds::new(2.5)).unwrap();
        assert_eq!(json, "2.5");
    }
}
