//! Constraint synthesis from a classified port list.

use crate::constraints::{ConstraintDocument, DelayKind, Directive};
use clockmap_common::Nanoseconds;
use clockmap_rtl::{Classification, ClassifiedPort, Direction, DomainGraph};

/// Board-level environment appended after the I/O delays.
#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    /// Output load in pF.
    pub load: f64,
    /// Library cell assumed to drive every input.
    pub driving_cell: String,
    /// Output pin of `driving_cell`.
    pub driving_pin: String,
    /// Clock transition time.
    pub clock_transition: Nanoseconds,
}

/// Global parameters of one synthesis run.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    /// Module name shown in the document header.
    pub top: Option<String>,
    /// Period for domains without an override and for unassigned ports.
    pub period: Nanoseconds,
    /// Applied once to all clocks.
    pub uncertainty: Nanoseconds,
    /// I/O delay as a fraction of the relevant period.
    pub io_delay_fraction: f64,
    /// Optional environment block.
    pub environment: Option<Environment>,
}

impl Default for SynthesisParams {
    fn default() -> Self {
        Self {
            top: None,
            period: Nanoseconds::new(10.0),
            uncertainty: Nanoseconds::new(0.2),
            io_delay_fraction: 0.3,
            environment: None,
        }
    }
}

/// Builds the constraints document in a single pass.
///
/// Sections in order: header, clock declarations (domain order), one
/// uncertainty line, false paths (crossing order), I/O delays (port order)
/// with unresolved ports grouped last, then the optional environment.
/// Clock ports get no delay; every other port gets exactly one.
pub fn synthesize(
    graph: &DomainGraph,
    classification: &Classification,
    params: &SynthesisParams,
) -> ConstraintDocument {
    let mut doc = ConstraintDocument::new();

    doc.comment("Auto-generated SDC constraints");
    if let Some(top) = &params.top {
        doc.comment(format!("Top module: {top}"));
    }
    doc.comment("Generated by: clockmap");
    doc.push(Directive::Blank);

    doc.comment("Clock Definitions");
    doc.comment(format!(
        "Default period: {} ns ({:.1} MHz)",
        params.period,
        params.period.as_mhz()
    ));
    for domain in &graph.domains {
        doc.push(Directive::CreateClock {
            name: domain.id.clone(),
            period: domain.effective_period(params.period),
        });
    }
    doc.push(Directive::Blank);

    doc.comment("Clock Uncertainty (jitter + skew)");
    doc.push(Directive::ClockUncertainty(params.uncertainty));
    doc.push(Directive::Blank);

    if !graph.crossings.is_empty() {
        doc.comment("Asynchronous Clock Domain Crossings");
        for crossing in &graph.crossings {
            doc.push(Directive::FalsePath {
                from: crossing.from.clone(),
                to: crossing.to.clone(),
            });
        }
        doc.push(Directive::Blank);
    }

    let (assigned, unassigned): (Vec<&ClassifiedPort>, Vec<&ClassifiedPort>) =
        classification.signals().partition(|p| p.domain.is_some());
    let percent = (params.io_delay_fraction * 1000.0).round() / 10.0;

    if !assigned.is_empty() {
        doc.comment(format!("I/O Delays ({percent}% of clock period)"));
        for port in &assigned {
            doc.push(delay_directive(port, graph, params));
        }
        doc.push(Directive::Blank);
    }

    if !unassigned.is_empty() {
        doc.comment("Signals without a resolved clock domain");
        doc.comment(format!(
            "Delays use the default period; review before sign-off ({percent}% of {} ns)",
            params.period
        ));
        for port in &unassigned {
            doc.push(delay_directive(port, graph, params));
        }
        doc.push(Directive::Blank);
    }

    if let Some(env) = &params.environment {
        doc.comment("Environmental Constraints");
        doc.push(Directive::SetLoad(env.load));
        doc.push(Directive::DrivingCell {
            cell: env.driving_cell.clone(),
            pin: env.driving_pin.clone(),
        });
        if !graph.domains.is_empty() {
            doc.push(Directive::ClockTransition(env.clock_transition));
        }
    }

    tracing::debug!(
        clocks = doc.clock_count(),
        false_paths = doc.false_path_count(),
        delays = doc.delay_count(),
        unassigned = unassigned.len(),
        "synthesized constraints"
    );
    doc
}

fn delay_directive(
    port: &ClassifiedPort,
    graph: &DomainGraph,
    params: &SynthesisParams,
) -> Directive {
    let period = graph.period_of(port, params.period);
    let kind = match port.port.direction {
        Direction::Output => DelayKind::Output,
        // Inout pins are constrained on their input side.
        Direction::Input | Direction::Inout => DelayKind::Input,
    };
    Directive::IoDelay {
        kind,
        clock: port.domain.clone(),
        delay: period.scale(params.io_delay_fraction).round_tenth(),
        port: port.port.name.clone(),
    }
}
