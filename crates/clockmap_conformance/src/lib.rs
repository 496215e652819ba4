//! Conformance test helpers for clockmap.
//!
//! Provides shared functions that run HDL source text through the full
//! pipeline (locate → extract → classify → graph → synthesize) and patch
//! template text, returning structured results for assertion in
//! integration tests.

#![warn(missing_docs)]

use clockmap_common::Nanoseconds;
use clockmap_config::{load_config_from_str, Config};
use clockmap_diagnostics::{Diagnostic, DiagnosticSink, FileId, Severity};
use clockmap_formal::{patch, FileSet, PatchError, PatchSpec, TemplateDocument};
use clockmap_rtl::{
    classify, extract_module_ports, Classification, DomainGraph, PatternTable, Port,
};
use clockmap_timing::{synthesize, ConstraintDocument, SynthesisParams};

/// Result of running the full constraint pipeline on one module.
pub struct PipelineResult {
    /// Extracted ports in declaration order.
    pub ports: Vec<Port>,
    /// Declarations skipped by the extractor.
    pub skipped: usize,
    /// Role and domain of every port.
    pub classification: Classification,
    /// Domains and crossings.
    pub graph: DomainGraph,
    /// The synthesized document.
    pub constraints: ConstraintDocument,
    /// The rendered document.
    pub sdc: String,
    /// All diagnostics emitted during the pipeline.
    pub diagnostics: Vec<Diagnostic>,
    /// Whether any errors were emitted.
    pub has_errors: bool,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// Rendered lines starting with `prefix`.
    pub fn lines_starting_with(&self, prefix: &str) -> Vec<&str> {
        self.sdc.lines().filter(|l| l.starts_with(prefix)).collect()
    }
}

/// Parses a `clockmap.toml` snippet, panicking on invalid input.
pub fn make_config(toml: &str) -> Config {
    match load_config_from_str(toml) {
        Ok(config) => config,
        Err(e) => panic!("invalid test config: {e}"),
    }
}

/// Runs the pipeline with default configuration.
pub fn full_pipeline(source: &str, top: &str) -> PipelineResult {
    full_pipeline_with_config(source, top, &Config::default())
}

/// Runs the pipeline with the given configuration.
///
/// A missing module yields an empty result with the `P004` diagnostic.
pub fn full_pipeline_with_config(source: &str, top: &str, config: &Config) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let extraction =
        extract_module_ports(source, top, FileId::from_raw(0), &sink).unwrap_or_default();

    let table = PatternTable {
        clock: config.classify.clock_patterns.clone(),
        reset: config.classify.reset_patterns.clone(),
        interface_prefixes: config.classify.interface_prefixes.clone(),
    };
    let classification = classify(&extraction.ports, &table, &sink);
    let periods = match config.clock_periods() {
        Ok(periods) => periods,
        Err(e) => panic!("invalid clock overrides: {e}"),
    };
    let graph = DomainGraph::build(&classification, &periods);

    let params = SynthesisParams {
        top: Some(top.to_string()),
        period: Nanoseconds::new(config.timing.period),
        uncertainty: Nanoseconds::new(config.timing.uncertainty),
        io_delay_fraction: config.timing.io_delay_fraction,
        environment: None,
    };
    let constraints = synthesize(&graph, &classification, &params);
    let sdc = constraints.render();

    let diagnostics = sink.take_all();
    let warning_count = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .count();
    PipelineResult {
        ports: extraction.ports,
        skipped: extraction.skipped,
        classification,
        graph,
        constraints,
        sdc,
        has_errors: sink.has_errors(),
        warning_count,
        diagnostics,
    }
}

/// Patches `template` with the given file names using the default settings.
pub fn patch_text(template: &str, files: &[&str]) -> Result<String, PatchError> {
    patch_text_with(template, files, &PatchSpec::default())
}

/// Patches `template` with the given file names and settings.
pub fn patch_text_with(
    template: &str,
    files: &[&str],
    spec: &PatchSpec,
) -> Result<String, PatchError> {
    let doc = TemplateDocument::parse(template);
    patch(&doc, &FileSet::new(files.iter().copied()), spec).map(|d| d.render())
}

/// Returns the lines of `text` outside the managed section bodies.
///
/// Marker lines are kept; body lines up to the closing line are dropped.
/// Comparing this view before and after a patch checks that opaque content
/// survived unchanged.
pub fn opaque_lines(text: &str, spec: &PatchSpec) -> Vec<String> {
    let mut kept = Vec::new();
    let mut skipping: Option<(&[clockmap_common::Glob], &str)> = None;
    let mut read_seen = false;
    let mut files_seen = false;

    for line in TemplateDocument::parse(text).lines() {
        let key = line.trim_end();
        if let Some((closing, other)) = skipping {
            if key == other || closing.iter().any(|g| g.matches(key)) {
                skipping = None;
            } else {
                continue;
            }
        }
        if !read_seen && key == spec.read_marker {
            read_seen = true;
            skipping = Some((&spec.read_closing, &spec.files_marker));
        } else if !files_seen && key == spec.files_marker {
            files_seen = true;
            skipping = Some((&spec.files_closing, &spec.read_marker));
        }
        kept.push(line.clone());
    }
    kept
}
