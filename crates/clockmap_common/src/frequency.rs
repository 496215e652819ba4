//! Clock frequencies with unit parsing and period conversion.

use crate::nanos::Nanoseconds;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock frequency stored in Hertz.
///
/// Parsed from strings like `"125MHz"`, `"32.768KHz"` or `"1GHz"` as they
/// appear in `[clocks.*]` overrides, and converted to a clock period for
/// `create_clock` directives.
#[derive(Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the clock period, or `None` for a non-positive frequency.
    pub fn period(&self) -> Option<Nanoseconds> {
        if self.0 > 0.0 {
            Some(Nanoseconds::new(1_000_000_000.0 / self.0))
        } else {
            None
        }
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error type for parsing frequency strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid frequency: '{}'", self.input)
    }
}

impl std::error::Error for ParseFrequencyError {}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1_000_000_000.0)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        if !val.is_finite() {
            return Err(err());
        }
        Ok(Frequency(val * scale))
    }
}
