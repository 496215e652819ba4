//! `clockmap classify`: clock-structure report for the top module.

use std::fmt::Write as _;
use std::path::PathBuf;

use clockmap_common::Nanoseconds;
use clockmap_diagnostics::{Diagnostic, DiagnosticSink, SourceMap};
use clockmap_rtl::{ClassifiedPort, ClockDomain, CrossingPair};
use serde::Serialize;

use crate::pipeline::{analyze, exit_code, load_project, render_diagnostics, Analysis};
use crate::{ClassifyArgs, GlobalArgs, ReportFormat};

/// The machine-readable classification summary.
#[derive(Serialize)]
struct Report<'a> {
    top: &'a str,
    file: &'a PathBuf,
    default_period: Nanoseconds,
    ports: &'a [ClassifiedPort],
    domains: &'a [ClockDomain],
    crossings: &'a [CrossingPair],
    unassigned: Vec<&'a str>,
    skipped: usize,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Report<'a> {
    fn new(analysis: &'a Analysis, default_period: Nanoseconds, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            top: &analysis.top,
            file: &analysis.file,
            default_period,
            ports: &analysis.classification.ports,
            domains: &analysis.graph.domains,
            crossings: &analysis.graph.crossings,
            unassigned: analysis
                .classification
                .unassigned()
                .map(|p| p.port.name.as_str())
                .collect(),
            skipped: analysis.extraction.skipped,
            diagnostics,
        }
    }

    fn render_text(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Top module  : {}", self.top);
        let _ = writeln!(out, "Source      : {}", self.file.display());
        let _ = writeln!(out, "Clocks      : {}", self.domains.len());
        for domain in self.domains {
            let period = domain.effective_period(self.default_period);
            let members = if domain.ports.is_empty() {
                "-".to_string()
            } else {
                domain.ports.join(", ")
            };
            let _ = writeln!(
                out,
                "  {} ({period} ns, {:.1} MHz): {members}",
                domain.id,
                period.as_mhz()
            );
        }
        let _ = writeln!(out, "Crossings   : {}", self.crossings.len());
        for crossing in self.crossings {
            let _ = writeln!(out, "  {} -> {}", crossing.from, crossing.to);
        }
        let _ = writeln!(out, "Unassigned  : {}", self.unassigned.len());
        for name in &self.unassigned {
            if let Some(port) = self.ports.iter().find(|p| p.port.name == *name) {
                let _ = writeln!(
                    out,
                    "  {} ({}, {} bit(s))",
                    name, port.port.direction, port.port.width
                );
            }
        }
        let _ = writeln!(out, "Skipped     : {}", self.skipped);
        out
    }
}

/// Runs the `clockmap classify` command.
pub fn run(args: &ClassifyArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let mut sources = SourceMap::new();
    let sink = DiagnosticSink::new();

    let Some(analysis) = analyze(&project, &args.design, &mut sources, &sink)? else {
        render_diagnostics(&sink, &sources, global.color, args.format);
        return Ok(1);
    };
    let default_period = Nanoseconds::new(project.config.timing.period);

    match args.format {
        ReportFormat::Text => {
            render_diagnostics(&sink, &sources, global.color, args.format);
            let report = Report::new(&analysis, default_period, Vec::new());
            print!("{}", report.render_text());
        }
        ReportFormat::Json => {
            let report = Report::new(&analysis, default_period, sink.diagnostics());
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(exit_code(&sink))
}
