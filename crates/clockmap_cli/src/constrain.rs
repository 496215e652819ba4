//! `clockmap constrain`: SDC generation for the top module.
//!
//! 1. Load `clockmap.toml` (or defaults) and apply CLI overrides
//! 2. Locate the top module and extract its ports
//! 3. Classify ports and build the domain graph
//! 4. Synthesize and write the constraints document
//! 5. Render diagnostics

use clockmap_common::Nanoseconds;
use clockmap_config::{EnvironmentConfig, TimingConfig};
use clockmap_diagnostics::{DiagnosticSink, Severity, SourceMap};
use clockmap_timing::{synthesize, Environment, SynthesisParams};

use crate::pipeline::{analyze, exit_code, load_project, render_diagnostics, write_output};
use crate::{ConstrainArgs, GlobalArgs};

/// Runs the `clockmap constrain` command.
///
/// Returns exit code 1 when the top module could not be analysed.
pub fn run(args: &ConstrainArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let timing = merge_timing(project.config.timing, args);
    timing.validate()?;

    let mut sources = SourceMap::new();
    let sink = DiagnosticSink::new();

    let analysis = analyze(&project, &args.design, &mut sources, &sink)?;
    let Some(analysis) = analysis else {
        render_diagnostics(&sink, &sources, global.color, args.format);
        return Ok(1);
    };

    let params = SynthesisParams {
        top: Some(analysis.top.clone()),
        period: Nanoseconds::new(timing.period),
        uncertainty: Nanoseconds::new(timing.uncertainty),
        io_delay_fraction: timing.io_delay_fraction,
        environment: project.config.environment.as_ref().map(environment),
    };
    let doc = synthesize(&analysis.graph, &analysis.classification, &params);
    write_output(args.output.as_deref(), &doc.render())?;

    render_diagnostics(&sink, &sources, global.color, args.format);

    if !global.quiet {
        eprintln!(
            "   Constrained {}: {} clock(s), {} false path(s), {} delay(s), {} skipped, {} warning(s)",
            analysis.top,
            doc.clock_count(),
            doc.false_path_count(),
            doc.delay_count(),
            analysis.extraction.skipped,
            sink.count(Severity::Warning),
        );
        if let Some(path) = &args.output {
            eprintln!("   Wrote {}", path.display());
        }
    }

    Ok(exit_code(&sink))
}

/// Applies `--period`, `--uncertainty` and `--io-delay-fraction` over the config.
fn merge_timing(mut timing: TimingConfig, args: &ConstrainArgs) -> TimingConfig {
    if let Some(period) = args.period {
        timing.period = period;
    }
    if let Some(uncertainty) = args.uncertainty {
        timing.uncertainty = uncertainty;
    }
    if let Some(fraction) = args.io_delay_fraction {
        timing.io_delay_fraction = fraction;
    }
    timing
}

fn environment(env: &EnvironmentConfig) -> Environment {
    Environment {
        load: env.load,
        driving_cell: env.driving_cell.clone(),
        driving_pin: env.driving_pin.clone(),
        clock_transition: Nanoseconds::new(env.clock_transition),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DesignArgs, ReportFormat};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn args(output: Option<PathBuf>) -> ConstrainArgs {
        ConstrainArgs {
            design: DesignArgs::default(),
            period: None,
            uncertainty: None,
            io_delay_fraction: None,
            output,
            format: ReportFormat::Text,
        }
    }

    fn global(config: PathBuf) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(config),
        }
    }

    #[test]
    fn cli_flags_override_config() {
        let mut a = args(None);
        a.period = Some(5.0);
        a.io_delay_fraction = Some(0.5);
        let merged = merge_timing(TimingConfig::default(), &a);
        assert_eq!(merged.period, 5.0);
        assert_eq!(merged.uncertainty, 0.2);
        assert_eq!(merged.io_delay_fraction, 0.5);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("clockmap.toml");
        fs::write(&config, "[design]\ntop = \"t\"\n").unwrap();
        let mut a = args(None);
        a.io_delay_fraction = Some(2.0);
        let err = run(&a, &global(config)).err().unwrap();
        assert!(err.to_string().contains("io_delay_fraction"));
    }

    #[test]
    fn writes_constraints_file() {
        let tmp = TempDir::new().unwrap();
        let rtl = tmp.path().join("rtl");
        fs::create_dir_all(&rtl).unwrap();
        fs::write(
            rtl.join("gcd.v"),
            "module gcd (input clk, input rst, input [31:0] a, output [31:0] y);\nendmodule\n",
        )
        .unwrap();
        let config = tmp.path().join("clockmap.toml");
        fs::write(&config, "[design]\ntop = \"gcd\"\n\n[environment]\n").unwrap();
        let out = tmp.path().join("syn").join("gcd.sdc");

        let code = run(&args(Some(out.clone())), &global(config)).unwrap();
        assert_eq!(code, 0);
        let sdc = fs::read_to_string(&out).unwrap();
        assert!(sdc.contains("# Top module: gcd"));
        assert!(sdc.contains("create_clock -name clk -period 10.0 [get_ports clk]"));
        assert!(sdc.contains("set_output_delay -clock clk 3.0 [get_ports y]"));
        assert!(sdc.contains("set_load 0.03 [all_outputs]"));
    }

    #[test]
    fn missing_module_exits_one_without_output() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("rtl")).unwrap();
        let config = tmp.path().join("clockmap.toml");
        fs::write(&config, "[design]\ntop = \"absent\"\n").unwrap();
        let out = tmp.path().join("absent.sdc");
        let code = run(&args(Some(out.clone())), &global(config)).unwrap();
        assert_eq!(code, 1);
        assert!(!out.exists());
    }
}
