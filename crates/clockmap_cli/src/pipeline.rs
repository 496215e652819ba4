//! Shared pipeline helpers for CLI commands.
//!
//! Project and configuration resolution, locating the top module among the
//! RTL sources, running the extract/classify/graph stages, diagnostic
//! rendering and atomic file output.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clockmap_config::{load_config, ClassifyConfig, Config, CONFIG_FILE_NAME};
use clockmap_diagnostics::{
    Diagnostic, DiagnosticCode, DiagnosticRenderer, DiagnosticSink, SourceMap, Span,
    TerminalRenderer,
};
use clockmap_formal::FileSet;
use clockmap_rtl::{
    classify, extract_module_ports, locate_module, Classification, ClockRole, DomainGraph,
    PatternTable, PortExtraction,
};

use crate::{DesignArgs, GlobalArgs, ReportFormat};

/// A loaded configuration and the directory relative paths resolve against.
pub struct Project {
    /// Directory holding `clockmap.toml`, or the working directory.
    pub root: PathBuf,
    /// The parsed configuration (defaults when no file exists).
    pub config: Config,
}

impl Project {
    /// Resolves a configured path against the project root.
    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}

/// Walks up from `start` looking for the nearest directory containing `clockmap.toml`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Loads the project configuration.
///
/// `--config` names the file explicitly. Otherwise the nearest
/// `clockmap.toml` above the working directory is used, and when there is
/// none every setting takes its default.
pub fn load_project(global: &GlobalArgs) -> Result<Project, Box<dyn std::error::Error>> {
    let (root, file) = match &global.config {
        Some(path) => {
            let root = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
            (root, Some(path.clone()))
        }
        None => {
            let cwd = std::env::current_dir()?;
            match find_project_root(&cwd) {
                Some(root) => {
                    let file = root.join(CONFIG_FILE_NAME);
                    (root, Some(file))
                }
                None => (cwd, None),
            }
        }
    };

    let config = match file {
        Some(path) => {
            let config =
                load_config(&path).map_err(|e| format!("{}: {e}", path.display()))?;
            tracing::info!(config = %path.display(), "loaded configuration");
            config
        }
        None => {
            tracing::info!("no {CONFIG_FILE_NAME} found, using defaults");
            Config::default()
        }
    };
    Ok(Project { root, config })
}

/// Converts the `[classify]` table into the classifier's pattern table.
pub fn pattern_table(classify: &ClassifyConfig) -> PatternTable {
    PatternTable {
        clock: classify.clock_patterns.clone(),
        reset: classify.reset_patterns.clone(),
        interface_prefixes: classify.interface_prefixes.clone(),
    }
}

/// The RTL directory: the CLI override as given, else `design.rtl_dir` under the root.
pub fn rtl_dir(project: &Project, cli_override: Option<&Path>) -> PathBuf {
    match cli_override {
        Some(dir) => dir.to_path_buf(),
        None => project.path(&project.config.design.rtl_dir),
    }
}

/// Everything derived from the top module's port list.
pub struct Analysis {
    /// Name of the analysed module.
    pub top: String,
    /// File the module was found in.
    pub file: PathBuf,
    /// Extracted ports and skip count.
    pub extraction: PortExtraction,
    /// Role and domain of every port.
    pub classification: Classification,
    /// Domains and crossings.
    pub graph: DomainGraph,
}

/// Finds the top module and runs extraction, classification and graph building.
///
/// Returns `Ok(None)` when the module cannot be found; the reason is in `sink`.
pub fn analyze(
    project: &Project,
    design: &DesignArgs,
    sources: &mut SourceMap,
    sink: &DiagnosticSink,
) -> Result<Option<Analysis>, Box<dyn std::error::Error>> {
    let top = design
        .top
        .clone()
        .or_else(|| project.config.design.top.clone())
        .ok_or("no top module given; set `design.top` in clockmap.toml or pass --top")?;

    let candidates: Vec<PathBuf> = match &design.source {
        Some(path) => vec![path.clone()],
        None => {
            let dir = rtl_dir(project, design.rtl_dir.as_deref());
            let files = FileSet::scan(&dir, &project.config.design.extensions, sink)?;
            files.names().iter().map(|name| dir.join(name)).collect()
        }
    };

    let mut found = None;
    for path in &candidates {
        let bytes =
            std::fs::read(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
        let text = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(
                    file = %path.display(),
                    "source is not valid UTF-8, decoding lossily"
                );
                String::from_utf8_lossy(e.as_bytes()).into_owned()
            }
        };
        if design.source.is_some() || locate_module(&text, &top).is_some() {
            found = Some((path.clone(), text));
            break;
        }
    }

    let Some((path, text)) = found else {
        sink.emit(
            Diagnostic::error(
                DiagnosticCode::MODULE_NOT_FOUND,
                format!("module `{top}` not found"),
                Span::DUMMY,
            )
            .with_note(format!("searched {} source file(s)", candidates.len()))
            .with_help("pass the file explicitly or check `design.rtl_dir`"),
        );
        return Ok(None);
    };

    tracing::info!(module = %top, file = %path.display(), "analysing top module");
    let file = sources.add(path.clone(), text.clone());
    let Some(extraction) = extract_module_ports(&text, &top, file, sink) else {
        return Ok(None);
    };

    let classification = classify(
        &extraction.ports,
        &pattern_table(&project.config.classify),
        sink,
    );

    let periods = project.config.clock_periods()?;
    for name in periods.keys() {
        if classification
            .get(name)
            .map_or(true, |p| p.role != ClockRole::Clock)
        {
            tracing::warn!(clock = %name, module = %top, "period override names no clock port");
        }
    }
    let graph = DomainGraph::build(&classification, &periods);

    Ok(Some(Analysis {
        top,
        file: path,
        extraction,
        classification,
        graph,
    }))
}

/// Renders all diagnostics to stderr. Returns how many were rendered.
///
/// JSON goes to stderr as well so it never mixes with generated output on stdout.
pub fn render_diagnostics(
    sink: &DiagnosticSink,
    sources: &SourceMap,
    color: bool,
    format: ReportFormat,
) -> usize {
    let diagnostics = sink.diagnostics();
    match format {
        ReportFormat::Text => {
            let renderer = TerminalRenderer::new(color);
            for diag in &diagnostics {
                eprintln!("{}", renderer.render(diag, sources));
            }
        }
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(&diagnostics).unwrap_or_else(|_| "[]".to_string());
            eprintln!("{json}");
        }
    }
    diagnostics.len()
}

/// Exit code for a finished run: 1 if any error diagnostic was emitted.
pub fn exit_code(sink: &DiagnosticSink) -> i32 {
    if sink.has_errors() {
        1
    } else {
        0
    }
}

/// Writes `contents` to a sibling temporary file and renames it over `path`.
///
/// A failure leaves any existing file at `path` untouched.
pub fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("{} is not a file path", path.display()),
        )
    })?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut tmp_name = OsString::from(".");
    tmp_name.push(name);
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, contents)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// Writes to `path` atomically, or to stdout when `path` is `None`.
pub fn write_output(path: Option<&Path>, contents: &str) -> std::io::Result<()> {
    match path {
        Some(path) => write_atomic(path, contents),
        None => {
            use std::io::Write;
            std::io::stdout().write_all(contents.as_bytes())
        }
    }
}
