//! clockmap CLI: clock-domain inference and constraint generation for RTL modules.
//!
//! Provides `clockmap constrain` to write SDC timing constraints for a top
//! module, `clockmap classify` to report its clocks, domains and crossings,
//! and `clockmap formal` to refresh the source lists of a formal
//! verification configuration.

#![warn(missing_docs)]

mod classify;
mod constrain;
mod formal;
mod logger;
mod pipeline;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// clockmap: infer clock domains from port lists and derive constraints.
#[derive(Parser, Debug)]
#[command(name = "clockmap", version, about = "Clock-domain constraint generator")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `clockmap.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate SDC timing constraints for the top module.
    Constrain(ConstrainArgs),
    /// Report the clock structure of the top module.
    Classify(ClassifyArgs),
    /// Regenerate the source sections of a formal configuration file.
    Formal(FormalArgs),
}

/// Options selecting the module to analyse.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct DesignArgs {
    /// HDL file holding the top module; by default the RTL directory is searched.
    pub source: Option<PathBuf>,

    /// Top module name (overrides `design.top`).
    #[arg(long)]
    pub top: Option<String>,

    /// RTL source directory (overrides `design.rtl_dir`).
    #[arg(long)]
    pub rtl_dir: Option<PathBuf>,
}

/// Arguments for the `clockmap constrain` subcommand.
#[derive(Parser, Debug)]
pub struct ConstrainArgs {
    /// Module selection.
    #[command(flatten)]
    pub design: DesignArgs,

    /// Default clock period in ns (overrides `timing.period`).
    #[arg(long)]
    pub period: Option<f64>,

    /// Clock uncertainty in ns (overrides `timing.uncertainty`).
    #[arg(long)]
    pub uncertainty: Option<f64>,

    /// I/O delay as a fraction of the period (overrides `timing.io_delay_fraction`).
    #[arg(long)]
    pub io_delay_fraction: Option<f64>,

    /// Output file; constraints go to stdout when omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `clockmap classify` subcommand.
#[derive(Parser, Debug)]
pub struct ClassifyArgs {
    /// Module selection.
    #[command(flatten)]
    pub design: DesignArgs,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `clockmap formal` subcommand.
#[derive(Parser, Debug)]
pub struct FormalArgs {
    /// Template to patch (overrides `formal.template`).
    pub template: Option<PathBuf>,

    /// RTL source directory (overrides `design.rtl_dir`).
    #[arg(long)]
    pub rtl_dir: Option<PathBuf>,

    /// Directory prefix of files-section entries (overrides `formal.file_prefix`).
    #[arg(long)]
    pub file_prefix: Option<String>,

    /// Write the patched document here instead of replacing the template.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only check whether the template is up to date; exit 1 if not.
    #[arg(long)]
    pub check: bool,

    /// Output format for diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Diagnostic and report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    logger::init_logger(cli.quiet, cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Constrain(ref args) => constrain::run(args, &global),
        Command::Classify(ref args) => classify::run(args, &global),
        Command::Formal(ref args) => formal::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
