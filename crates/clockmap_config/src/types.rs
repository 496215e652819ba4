//! Configuration types deserialized from `clockmap.toml`.

use crate::error::ConfigError;
use clockmap_common::{Frequency, Glob, Nanoseconds};
use serde::Deserialize;
use std::collections::BTreeMap;

/// The top-level configuration parsed from `clockmap.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Which module to analyse and where its sources live.
    #[serde(default)]
    pub design: DesignConfig,
    /// Global timing parameters.
    #[serde(default)]
    pub timing: TimingConfig,
    /// Naming patterns driving signal classification.
    #[serde(default)]
    pub classify: ClassifyConfig,
    /// Per-clock period overrides, keyed by clock port name.
    #[serde(default)]
    pub clocks: BTreeMap<String, ClockOverride>,
    /// Optional environment constraints appended to the SDC output.
    #[serde(default)]
    pub environment: Option<EnvironmentConfig>,
    /// Formal configuration template settings.
    #[serde(default)]
    pub formal: FormalConfig,
}

impl Config {
    /// Returns the validated period of every `[clocks.*]` override.
    pub fn clock_periods(&self) -> Result<BTreeMap<String, Nanoseconds>, ConfigError> {
        self.clocks
            .iter()
            .map(|(name, clock)| Ok((name.clone(), clock.period_for(name)?)))
            .collect()
    }
}

/// The design under analysis.
#[derive(Debug, Deserialize)]
pub struct DesignConfig {
    /// Name of the top module whose ports are classified.
    #[serde(default)]
    pub top: Option<String>,
    /// Directory holding the RTL sources.
    #[serde(default = "default_rtl_dir")]
    pub rtl_dir: String,
    /// File extensions recognized as RTL sources (without the dot).
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            top: None,
            rtl_dir: default_rtl_dir(),
            extensions: default_extensions(),
        }
    }
}

fn default_rtl_dir() -> String {
    "rtl".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["v".to_string(), "sv".to_string()]
}

/// Global timing parameters for constraint synthesis.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TimingConfig {
    /// Default clock period in nanoseconds.
    #[serde(default = "default_period")]
    pub period: f64,
    /// Clock uncertainty (jitter + skew) in nanoseconds.
    #[serde(default = "default_uncertainty")]
    pub uncertainty: f64,
    /// I/O delay as a fraction of the clock period, in `[0, 1]`.
    #[serde(default = "default_io_delay_fraction")]
    pub io_delay_fraction: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            period: default_period(),
            uncertainty: default_uncertainty(),
            io_delay_fraction: default_io_delay_fraction(),
        }
    }
}

impl TimingConfig {
    /// Checks that the period is positive, the uncertainty non-negative and
    /// the delay fraction within `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.period > 0.0 && self.period.is_finite()) {
            return Err(ConfigError::ValidationError(
                "timing.period must be a positive number".to_string(),
            ));
        }
        if !(self.uncertainty >= 0.0 && self.uncertainty.is_finite()) {
            return Err(ConfigError::ValidationError(
                "timing.uncertainty must not be negative".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.io_delay_fraction) {
            return Err(ConfigError::ValidationError(format!(
                "timing.io_delay_fraction must be within [0, 1], got {}",
                self.io_delay_fraction
            )));
        }
        Ok(())
    }
}

fn default_period() -> f64 {
    10.0
}

fn default_uncertainty() -> f64 {
    0.2
}

fn default_io_delay_fraction() -> f64 {
    0.3
}

/// Naming patterns used to classify ports as clocks or resets.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyConfig {
    /// Patterns identifying clock ports, checked in order.
    #[serde(default = "default_clock_patterns")]
    pub clock_patterns: Vec<Glob>,
    /// Patterns identifying reset ports, checked in order.
    #[serde(default = "default_reset_patterns")]
    pub reset_patterns: Vec<Glob>,
    /// Interface prefixes ignored when matching signals to clocks.
    #[serde(default = "default_interface_prefixes")]
    pub interface_prefixes: Vec<String>,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            clock_patterns: default_clock_patterns(),
            reset_patterns: default_reset_patterns(),
            interface_prefixes: default_interface_prefixes(),
        }
    }
}

fn default_clock_patterns() -> Vec<Glob> {
    Glob::list(&["*Clock*", "*clk"])
}

fn default_reset_patterns() -> Vec<Glob> {
    Glob::list(&["*Reset*", "*rst"])
}

fn default_interface_prefixes() -> Vec<String> {
    vec!["io_".to_string(), "i_".to_string(), "o_".to_string()]
}

/// A per-clock period override. Exactly one of the two fields must be set.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockOverride {
    /// Clock frequency with unit, e.g. `"125MHz"`.
    pub frequency: Option<String>,
    /// Clock period in nanoseconds.
    pub period: Option<f64>,
}

impl ClockOverride {
    /// Resolves this override to a positive period; `name` is used in errors.
    pub fn period_for(&self, name: &str) -> Result<Nanoseconds, ConfigError> {
        let period = match (&self.frequency, self.period) {
            (Some(freq), None) => freq
                .parse::<Frequency>()
                .map_err(|e| ConfigError::ValidationError(format!("clocks.{name}: {e}")))?
                .period(),
            (None, Some(ns)) if ns > 0.0 && ns.is_finite() => Some(Nanoseconds::new(ns)),
            (None, Some(_)) => None,
            _ => {
                return Err(ConfigError::ValidationError(format!(
                    "clocks.{name}: set exactly one of `frequency` or `period`"
                )))
            }
        };
        period.ok_or_else(|| {
            ConfigError::ValidationError(format!("clocks.{name}: period must be positive"))
        })
    }
}

/// Environment constraints carried over verbatim into the SDC output.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    /// Output load capacitance in pF.
    #[serde(default = "default_load")]
    pub load: f64,
    /// Library cell driving every input.
    #[serde(default = "default_driving_cell")]
    pub driving_cell: String,
    /// Output pin of the driving cell.
    #[serde(default = "default_driving_pin")]
    pub driving_pin: String,
    /// Clock transition time in nanoseconds.
    #[serde(default = "default_clock_transition")]
    pub clock_transition: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            load: default_load(),
            driving_cell: default_driving_cell(),
            driving_pin: default_driving_pin(),
            clock_transition: default_clock_transition(),
        }
    }
}

fn default_load() -> f64 {
    0.03
}

fn default_driving_cell() -> String {
    "sky130_fd_sc_hd__buf_2".to_string()
}

fn default_driving_pin() -> String {
    "A".to_string()
}

fn default_clock_transition() -> f64 {
    0.15
}

/// Settings for regenerating the formal verification configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FormalConfig {
    /// Path of the template document patched in place.
    #[serde(default)]
    pub template: Option<String>,
    /// Header line opening the section that receives `read` commands.
    #[serde(default = "default_read_marker")]
    pub read_marker: String,
    /// Header line opening the section that receives file paths.
    #[serde(default = "default_files_marker")]
    pub files_marker: String,
    /// Lines that end the generated part of the read section.
    #[serde(default = "default_read_closing")]
    pub read_closing: Vec<Glob>,
    /// Lines that end the generated part of the files section.
    #[serde(default = "default_files_closing")]
    pub files_closing: Vec<Glob>,
    /// Command prefix of each generated read line.
    #[serde(default = "default_read_command")]
    pub read_command: String,
    /// Extra lines always emitted after the generated read lines.
    #[serde(default)]
    pub aux_reads: Vec<String>,
    /// Directory prefix of each files-section entry; defaults to `design.rtl_dir`.
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for FormalConfig {
    fn default() -> Self {
        Self {
            template: None,
            read_marker: default_read_marker(),
            files_marker: default_files_marker(),
            read_closing: default_read_closing(),
            files_closing: default_files_closing(),
            read_command: default_read_command(),
            aux_reads: Vec::new(),
            file_prefix: None,
        }
    }
}

fn default_read_marker() -> String {
    "[script]".to_string()
}

fn default_files_marker() -> String {
    "[files]".to_string()
}

fn default_read_closing() -> Vec<Glob> {
    Glob::list(&["prep*", "[*]"])
}

fn default_files_closing() -> Vec<Glob> {
    Glob::list(&["[*]"])
}

fn default_read_command() -> String {
    "read -formal".to_string()
}
