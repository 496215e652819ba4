//! SDC directive model and rendering.
//!
//! A [`ConstraintDocument`] is an ordered list of [`Directive`]s; rendering
//! writes one directive per line and is fully deterministic.

use clockmap_common::Nanoseconds;
use std::fmt;

/// One line of a constraints document.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// `# text`
    Comment(String),
    /// An empty separator line.
    Blank,
    /// `create_clock -name <name> -period <period> [get_ports <name>]`
    CreateClock {
        /// Clock port and clock name.
        name: String,
        /// Clock period.
        period: Nanoseconds,
    },
    /// `set_clock_uncertainty <value> [all_clocks]`
    ClockUncertainty(Nanoseconds),
    /// `set_false_path -from [get_clocks <from>] -to [get_clocks <to>]`
    FalsePath {
        /// Launching clock.
        from: String,
        /// Capturing clock.
        to: String,
    },
    /// `set_input_delay` or `set_output_delay` for one port.
    IoDelay {
        /// Which delay command to emit.
        kind: DelayKind,
        /// Reference clock; `None` marks a port without a resolved domain.
        clock: Option<String>,
        /// External delay.
        delay: Nanoseconds,
        /// The constrained port.
        port: String,
    },
    /// `set_load <pf> [all_outputs]`
    SetLoad(f64),
    /// `set_driving_cell -lib_cell <cell> -pin <pin> [all_inputs]`
    DrivingCell {
        /// Library cell name.
        cell: String,
        /// Output pin of the cell.
        pin: String,
    },
    /// `set_clock_transition <value> [all_clocks]`
    ClockTransition(Nanoseconds),
}

/// Selects between `set_input_delay` and `set_output_delay`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayKind {
    /// `set_input_delay`
    Input,
    /// `set_output_delay`
    Output,
}

impl fmt::Display for DelayKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DelayKind::Input => f.write_str("set_input_delay"),
            DelayKind::Output => f.write_str("set_output_delay"),
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Comment(text) => write!(f, "# {text}"),
            Directive::Blank => Ok(()),
            Directive::CreateClock { name, period } => {
                write!(f, "create_clock -name {name} -period {period} [get_ports {name}]")
            }
            Directive::ClockUncertainty(value) => {
                write!(f, "set_clock_uncertainty {value} [all_clocks]")
            }
            Directive::FalsePath { from, to } => write!(
                f,
                "set_false_path -from [get_clocks {from}] -to [get_clocks {to}]"
            ),
            Directive::IoDelay {
                kind,
                clock: Some(clock),
                delay,
                port,
            } => write!(f, "{kind} -clock {clock} {delay} [get_ports {port}]"),
            Directive::IoDelay {
                kind,
                clock: None,
                delay,
                port,
            } => write!(f, "{kind} {delay} [get_ports {port}] ;# unassigned: no clock domain"),
            Directive::SetLoad(load) => {
                write!(f, "set_load {} [all_outputs]", picofarads(*load))
            }
            Directive::DrivingCell { cell, pin } => {
                write!(f, "set_driving_cell -lib_cell {cell} -pin {pin} [all_inputs]")
            }
            Directive::ClockTransition(value) => {
                write!(f, "set_clock_transition {value} [all_clocks]")
            }
        }
    }
}

/// Load capacitance with at least one decimal digit, like the time values.
fn picofarads(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

/// An ordered constraints document, regenerated from scratch on every run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintDocument {
    /// Lines in output order.
    pub directives: Vec<Directive>,
}

impl ConstraintDocument {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directive.
    pub fn push(&mut self, directive: Directive) {
        self.directives.push(directive);
    }

    /// Appends a comment line.
    pub fn comment(&mut self, text: impl Into<String>) {
        self.directives.push(Directive::Comment(text.into()));
    }

    /// Number of `create_clock` lines.
    pub fn clock_count(&self) -> usize {
        self.count(|d| matches!(d, Directive::CreateClock { .. }))
    }

    /// Number of `set_false_path` lines.
    pub fn false_path_count(&self) -> usize {
        self.count(|d| matches!(d, Directive::FalsePath { .. }))
    }

    /// Number of input and output delay lines.
    pub fn delay_count(&self) -> usize {
        self.count(|d| matches!(d, Directive::IoDelay { .. }))
    }

    fn count(&self, pred: impl Fn(&Directive) -> bool) -> usize {
        self.directives.iter().filter(|d| pred(d)).count()
    }

    /// Renders the document, one directive per line, with a final newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for directive in &self.directives {
            out.push_str(&directive.to_string());
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for ConstraintDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(v: f64) -> Nanoseconds {
        Nanoseconds::new(v)
    }

    #[test]
    fn create_clock_syntax() {
        let d = Directive::CreateClock {
            name: "io_blockClock".into(),
            period: ns(10.0),
        };
        assert_eq!(
            d.to_string(),
            "create_clock -name io_blockClock -period 10.0 [get_ports io_blockClock]"
        );
    }

    #[test]
    fn uncertainty_and_false_path_syntax() {
        assert_eq!(
            Directive::ClockUncertainty(ns(0.2)).to_string(),
            "set_clock_uncertainty 0.2 [all_clocks]"
        );
        let fp = Directive::FalsePath {
            from: "a".into(),
            to: "b".into(),
        };
        assert_eq!(
            fp.to_string(),
            "set_false_path -from [get_clocks a] -to [get_clocks b]"
        );
    }

    #[test]
    fn io_delay_syntax() {
        let input = Directive::IoDelay {
            kind: DelayKind::Input,
            clock: Some("clk".into()),
            delay: ns(3.0),
            port: "din".into(),
        };
        assert_eq!(input.to_string(), "set_input_delay -clock clk 3.0 [get_ports din]");
        let unassigned = Directive::IoDelay {
            kind: DelayKind::Output,
            clock: None,
            delay: ns(3.0),
            port: "io_msgOutReady".into(),
        };
        let text = unassigned.to_string();
        assert!(text.starts_with("set_output_delay 3.0 [get_ports io_msgOutReady]"));
        assert!(!text.contains("-clock"));
    }

    #[test]
    fn environment_syntax() {
        assert_eq!(Directive::SetLoad(0.03).to_string(), "set_load 0.03 [all_outputs]");
        assert_eq!(Directive::SetLoad(1.0).to_string(), "set_load 1.0 [all_outputs]");
        assert_eq!(Directive::SetLoad(0.125).to_string(), "set_load 0.125 [all_outputs]");
        let cell = Directive::DrivingCell {
            cell: "sky130_fd_sc_hd__buf_2".into(),
            pin: "A".into(),
        };
        assert_eq!(
            cell.to_string(),
            "set_driving_cell -lib_cell sky130_fd_sc_hd__buf_2 -pin A [all_inputs]"
        );
        assert_eq!(
            Directive::ClockTransition(ns(0.15)).to_string(),
            "set_clock_transition 0.15 [all_clocks]"
        );
    }

    #[test]
    fn render_lines_and_counts() {
        let mut doc = ConstraintDocument::new();
        doc.comment("Clock Definitions");
        doc.push(Directive::CreateClock {
            name: "clk".into(),
            period: ns(5.0),
        });
        doc.push(Directive::Blank);
        assert_eq!(
            doc.render(),
            "# Clock Definitions\ncreate_clock -name clk -period 5.0 [get_ports clk]\n\n"
        );
        assert_eq!(doc.clock_count(), 1);
        assert_eq!(doc.false_path_count(), 0);
        assert_eq!(doc.delay_count(), 0);
    }
}
