//! Naming-heuristic signal classification and domain binding.
//!
//! Each port gets a [`ClockRole`] from the [`PatternTable`]. Every
//! non-clock port is then bound to the clock whose *stem* it shares the
//! longest structural prefix with. The stem of `io_blockClock` is `block`
//! (interface prefix and matched pattern literal removed), so
//! `io_blockValid` and `io_blockReset` bind to it while `io_msgIn` does not.

use crate::pattern::PatternTable;
use crate::port::Port;
use clockmap_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink, Span};
use serde::Serialize;
use std::fmt;

/// The role of a port in the clocking structure.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClockRole {
    /// Drives a clock domain.
    Clock,
    /// A reset input or output.
    Reset,
    /// Any other signal.
    Data,
}

impl fmt::Display for ClockRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockRole::Clock => write!(f, "clock"),
            ClockRole::Reset => write!(f, "reset"),
            ClockRole::Data => write!(f, "data"),
        }
    }
}

/// Why a port ended up in its domain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    /// The port is itself the clock of its domain.
    Driver,
    /// Matched the clock stem on `shared` leading segments.
    SharedPrefix {
        /// Number of matching segments, at least 1.
        shared: usize,
    },
    /// No prefix matched, but the module has exactly one clock.
    SoleClock,
    /// No domain could be resolved.
    Unassigned,
}

/// A port with its role and resolved domain.
#[derive(Clone, Debug, Serialize)]
pub struct ClassifiedPort {
    /// The extracted port.
    pub port: Port,
    /// The assigned role.
    pub role: ClockRole,
    /// Name of the clock port whose domain this port belongs to.
    pub domain: Option<String>,
    /// How `domain` was chosen.
    pub binding: Binding,
}

/// The classification of a whole port list, in port order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Classification {
    /// One entry per port, in declaration order.
    pub ports: Vec<ClassifiedPort>,
}

impl Classification {
    /// Iterates over the clock ports in declaration order.
    pub fn clocks(&self) -> impl Iterator<Item = &ClassifiedPort> {
        self.ports.iter().filter(|p| p.role == ClockRole::Clock)
    }

    /// Iterates over the non-clock ports (resets and data) in declaration order.
    pub fn signals(&self) -> impl Iterator<Item = &ClassifiedPort> {
        self.ports.iter().filter(|p| p.role != ClockRole::Clock)
    }

    /// Iterates over the ports whose domain could not be resolved.
    pub fn unassigned(&self) -> impl Iterator<Item = &ClassifiedPort> {
        self.ports.iter().filter(|p| p.binding == Binding::Unassigned)
    }

    /// Returns the entry for the port called `name`.
    pub fn get(&self, name: &str) -> Option<&ClassifiedPort> {
        self.ports.iter().find(|p| p.port.name == name)
    }
}

/// Classifies `ports` against `table`.
///
/// A pure function of its inputs apart from the diagnostics: `C001` for
/// every unbound signal and `C002` when no port looks like a clock.
pub fn classify(ports: &[Port], table: &PatternTable, sink: &DiagnosticSink) -> Classification {
    // (clock name, stem segments) in declaration order.
    let mut clocks: Vec<(&str, Vec<String>)> = Vec::new();
    let mut roles = Vec::with_capacity(ports.len());

    for port in ports {
        let role = if let Some(glob) = table.clock_match(&port.name) {
            let stem = glob
                .stem(table.strip_interface(&port.name))
                .or_else(|| glob.stem(&port.name))
                .unwrap_or_default();
            clocks.push((port.name.as_str(), segments(&stem)));
            ClockRole::Clock
        } else if table.reset_match(&port.name).is_some() {
            ClockRole::Reset
        } else {
            ClockRole::Data
        };
        roles.push(role);
    }

    if clocks.is_empty() && !ports.is_empty() {
        let span = ports.first().map_or(Span::DUMMY, |p| p.span);
        sink.emit(
            Diagnostic::note(DiagnosticCode::NO_CLOCKS, "no port matches a clock pattern", span)
                .with_help("adjust `classify.clock_patterns` if the module is clocked"),
        );
    }

    let mut result = Classification::default();
    for (port, role) in ports.iter().zip(roles) {
        let (domain, binding) = if role == ClockRole::Clock {
            (Some(port.name.clone()), Binding::Driver)
        } else {
            bind(port, &clocks, table, sink)
        };
        tracing::debug!(
            port = %port.name,
            %role,
            domain = domain.as_deref().unwrap_or("-"),
            "classified port"
        );
        result.ports.push(ClassifiedPort {
            port: port.clone(),
            role,
            domain,
            binding,
        });
    }
    result
}

fn bind(
    port: &Port,
    clocks: &[(&str, Vec<String>)],
    table: &PatternTable,
    sink: &DiagnosticSink,
) -> (Option<String>, Binding) {
    let signal = segments(table.strip_interface(&port.name));

    let mut best: Option<(&str, usize)> = None;
    for (clock, stem) in clocks {
        let shared = shared_prefix(stem, &signal);
        // Strictly greater keeps the earliest clock on ties.
        if shared > 0 && best.map_or(true, |(_, n)| shared > n) {
            best = Some((*clock, shared));
        }
    }

    match (best, clocks) {
        (Some((clock, shared)), _) => (Some(clock.to_string()), Binding::SharedPrefix { shared }),
        (None, [(clock, _)]) => (Some(clock.to_string()), Binding::SoleClock),
        (None, _) => {
            let mut diag = Diagnostic::warning(
                DiagnosticCode::UNASSIGNED_SIGNAL,
                format!("cannot resolve a clock domain for `{}`", port.name),
                port.span,
            );
            if clocks.is_empty() {
                diag = diag.with_note("the module has no clock ports");
            } else {
                let names: Vec<&str> = clocks.iter().map(|(c, _)| *c).collect();
                diag = diag
                    .with_note(format!("no structural prefix shared with {}", names.join(", ")))
                    .with_note("its delay is emitted without a clock reference");
            }
            sink.emit(diag);
            (None, Binding::Unassigned)
        }
    }
}

/// Number of leading `stem` segments that `signal` repeats.
fn shared_prefix(stem: &[String], signal: &[String]) -> usize {
    stem.iter()
        .zip(signal)
        .take_while(|(a, b)| a.eq_ignore_ascii_case(b))
        .count()
}

/// Splits a name on `_` and on lower/digit-to-upper case boundaries.
pub(crate) fn segments(name: &str) -> Vec<String> {
    let mut out = Vec::new();
    for part in name.split('_').filter(|s| !s.is_empty()) {
        let mut current = String::new();
        let mut prev: Option<char> = None;
        for c in part.chars() {
            if c.is_ascii_uppercase()
                && prev.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit())
            {
                out.push(std::mem::take(&mut current));
            }
            current.push(c);
            prev = Some(c);
        }
        out.push(current);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::Direction;
    use clockmap_common::Glob;

    fn port(name: &str, direction: Direction) -> Port {
        Port {
            name: name.to_string(),
            direction,
            width: 1,
            span: Span::DUMMY,
        }
    }

    fn run(names: &[&str]) -> (Classification, Vec<Diagnostic>) {
        let ports: Vec<Port> = names.iter().map(|n| port(n, Direction::Input)).collect();
        let sink = DiagnosticSink::new();
        let result = classify(&ports, &PatternTable::default(), &sink);
        (result, sink.take_all())
    }

    #[test]
    fn segment_splitting() {
        assert_eq!(segments("blockValid"), vec!["block", "Valid"]);
        assert_eq!(segments("msg_in_valid"), vec!["msg", "in", "valid"]);
        assert_eq!(segments("axi4Lite"), vec!["axi4", "Lite"]);
        assert_eq!(segments("AXIData"), vec!["AXIData"]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn roles_follow_patterns() {
        let (c, _) = run(&["io_blockClock", "io_blockReset", "sys_rst", "data", "clk"]);
        let roles: Vec<ClockRole> = c.ports.iter().map(|p| p.role).collect();
        assert_eq!(
            roles,
            vec![
                ClockRole::Clock,
                ClockRole::Reset,
                ClockRole::Reset,
                ClockRole::Data,
                ClockRole::Clock
            ]
        );
    }

    #[test]
    fn clock_wins_over_reset() {
        let (c, _) = run(&["ResetClock"]);
        assert_eq!(c.ports[0].role, ClockRole::Clock);
    }

    #[test]
    fn shared_prefix_binding() {
        let (c, diags) = run(&["io_blockClock", "io_hubClock", "io_hubValid", "io_blockData"]);
        assert_eq!(c.get("io_hubValid").unwrap().domain.as_deref(), Some("io_hubClock"));
        assert_eq!(
            c.get("io_blockData").unwrap().binding,
            Binding::SharedPrefix { shared: 1 }
        );
        assert!(diags.is_empty());
    }

    #[test]
    fn longest_prefix_wins() {
        let (c, _) = run(&["mem_Clock", "mem_rd_Clock", "mem_rd_data"]);
        let data = c.get("mem_rd_data").unwrap();
        assert_eq!(data.domain.as_deref(), Some("mem_rd_Clock"));
        assert_eq!(data.binding, Binding::SharedPrefix { shared: 2 });
    }

    #[test]
    fn multi_literal_pattern_stems_from_wildcards() {
        let table = PatternTable {
            clock: Glob::list(&["*_clk_*"]),
            ..PatternTable::default()
        };
        let ports: Vec<Port> = ["dma_clk_tx", "dma_clk_rx", "dma_rx_data"]
            .iter()
            .map(|n| port(n, Direction::Input))
            .collect();
        let sink = DiagnosticSink::new();
        let c = classify(&ports, &table, &sink);
        let data = c.get("dma_rx_data").unwrap();
        assert_eq!(data.domain.as_deref(), Some("dma_clk_rx"));
        assert_eq!(data.binding, Binding::SharedPrefix { shared: 2 });
    }

    #[test]
    fn ties_go_to_earliest_clock() {
        let (c, _) = run(&["core_aClock", "core_bClock", "core_x"]);
        assert_eq!(c.get("core_x").unwrap().domain.as_deref(), Some("core_aClock"));
    }

    #[test]
    fn prefix_compare_ignores_case() {
        let (c, _) = run(&["io_blockClock", "io_hubClock", "io_BLOCK_valid"]);
        assert_eq!(
            c.get("io_BLOCK_valid").unwrap().domain.as_deref(),
            Some("io_blockClock")
        );
    }

    #[test]
    fn sole_clock_fallback() {
        let (c, diags) = run(&["clk", "rst", "din", "dout"]);
        for name in ["rst", "din", "dout"] {
            let p = c.get(name).unwrap();
            assert_eq!(p.domain.as_deref(), Some("clk"));
            assert_eq!(p.binding, Binding::SoleClock);
        }
        assert!(diags.is_empty());
    }

    #[test]
    fn unassigned_with_two_clocks() {
        let (c, diags) = run(&["io_blockClock", "io_hubClock", "io_msgIn"]);
        assert_eq!(c.get("io_msgIn").unwrap().binding, Binding::Unassigned);
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, DiagnosticCode::UNASSIGNED_SIGNAL);
        assert!(diags[0].message.contains("io_msgIn"));
    }

    #[test]
    fn no_clocks_reports_note_and_unassigned() {
        let (c, diags) = run(&["a", "b"]);
        assert_eq!(c.unassigned().count(), 2);
        assert_eq!(diags[0].code, DiagnosticCode::NO_CLOCKS);
        assert_eq!(diags.len(), 3);
    }

    #[test]
    fn empty_port_list() {
        let (c, diags) = run(&[]);
        assert!(c.ports.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn classification_is_deterministic() {
        let names = ["io_blockClock", "io_hubClock", "io_blockReset", "io_msgIn"];
        let (a, _) = run(&names);
        let (b, _) = run(&names);
        let a = serde_json::to_string(&a).unwrap();
        let b = serde_json::to_string(&b).unwrap();
        assert_eq!(a, b);
    }
}
