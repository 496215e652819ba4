//! `clockmap formal`: refresh the source sections of a formal configuration.

use std::path::PathBuf;

use clockmap_config::{DesignConfig, FormalConfig};
use clockmap_diagnostics::{DiagnosticSink, SourceMap};
use clockmap_formal::{patch, FileSet, PatchSpec, TemplateDocument};

use crate::pipeline::{exit_code, load_project, render_diagnostics, rtl_dir, write_atomic};
use crate::{FormalArgs, GlobalArgs};

/// Runs the `clockmap formal` command.
///
/// The template is only rewritten when its content changes. With
/// `--check` nothing is written and the exit code is 1 if the template is
/// out of date.
pub fn run(args: &FormalArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let project = load_project(global)?;
    let config = &project.config;

    let template_path = match (&args.template, &config.formal.template) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => project.path(path),
        (None, None) => {
            return Err(
                "no formal template given; set `formal.template` in clockmap.toml or pass a path"
                    .into(),
            )
        }
    };

    let sink = DiagnosticSink::new();
    let dir = rtl_dir(&project, args.rtl_dir.as_deref());
    let files = FileSet::scan(&dir, &config.design.extensions, &sink)?;
    let spec = patch_spec(&config.formal, &config.design, args.file_prefix.as_deref());

    let original = std::fs::read_to_string(&template_path)
        .map_err(|e| format!("cannot read {}: {e}", template_path.display()))?;
    let patched = patch(&TemplateDocument::parse(&original), &files, &spec)
        .map_err(|e| format!("{}: {e}", template_path.display()))?
        .render();

    render_diagnostics(&sink, &SourceMap::new(), global.color, args.format);

    let changed = patched != original;
    if args.check {
        if changed && !global.quiet {
            eprintln!("   {} is out of date", template_path.display());
        }
        return Ok(if changed { 1 } else { exit_code(&sink) });
    }

    let target: PathBuf = args.output.clone().unwrap_or_else(|| template_path.clone());
    if changed || target != template_path {
        write_atomic(&target, &patched)?;
        tracing::info!(path = %target.display(), files = files.len(), "wrote formal configuration");
        if !global.quiet {
            eprintln!("   Updated {} ({} source file(s))", target.display(), files.len());
        }
    } else if !global.quiet {
        eprintln!("   {} is up to date", template_path.display());
    }

    Ok(exit_code(&sink))
}

/// Builds the patcher settings; the file prefix falls back to `design.rtl_dir`.
fn patch_spec(formal: &FormalConfig, design: &DesignConfig, prefix: Option<&str>) -> PatchSpec {
    PatchSpec {
        read_marker: formal.read_marker.clone(),
        files_marker: formal.files_marker.clone(),
        read_closing: formal.read_closing.clone(),
        files_closing: formal.files_closing.clone(),
        read_command: formal.read_command.clone(),
        aux_reads: formal.aux_reads.clone(),
        file_prefix: prefix
            .map(str::to_string)
            .or_else(|| formal.file_prefix.clone())
            .unwrap_or_else(|| design.rtl_dir.clone()),
        files_closing_at_eof: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReportFormat;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const SBY: &str = "[options]\nmode prove\n\n[script]\nread -formal old.v\nprep -top top\n\n[files]\nrtl/old.v\n";

    fn setup(config: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().unwrap();
        let rtl = tmp.path().join("rtl");
        fs::create_dir_all(&rtl).unwrap();
        for name in ["b.sv", "a.v", "c.sv", "README.md"] {
            fs::write(rtl.join(name), "").unwrap();
        }
        fs::create_dir_all(tmp.path().join("formal")).unwrap();
        fs::write(tmp.path().join("formal/top.sby"), SBY).unwrap();
        let config_path = tmp.path().join("clockmap.toml");
        fs::write(&config_path, config).unwrap();
        (tmp, config_path)
    }

    fn args(check: bool) -> FormalArgs {
        FormalArgs {
            template: None,
            rtl_dir: None,
            file_prefix: None,
            output: None,
            check,
            format: ReportFormat::Text,
        }
    }

    fn global(config: &Path) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            color: false,
            config: Some(config.to_path_buf()),
        }
    }

    #[test]
    fn patches_template_in_place() {
        let (tmp, config) = setup("[formal]\ntemplate = \"formal/top.sby\"\n");
        assert_eq!(run(&args(false), &global(&config)).unwrap(), 0);
        let text = fs::read_to_string(tmp.path().join("formal/top.sby")).unwrap();
        assert_eq!(
            text,
            "[options]\nmode prove\n\n[script]\nread -formal a.v\nread -formal b.sv\n\
             read -formal c.sv\nprep -top top\n\n[files]\nrtl/a.v\nrtl/b.sv\nrtl/c.sv\n\n"
        );
    }

    #[test]
    fn check_reports_staleness_then_success() {
        let (_tmp, config) = setup("[formal]\ntemplate = \"formal/top.sby\"\n");
        assert_eq!(run(&args(true), &global(&config)).unwrap(), 1);
        assert_eq!(run(&args(false), &global(&config)).unwrap(), 0);
        assert_eq!(run(&args(true), &global(&config)).unwrap(), 0);
    }

    #[test]
    fn missing_marker_leaves_template_untouched() {
        let (tmp, config) = setup(
            "[formal]\ntemplate = \"formal/top.sby\"\nread_marker = \"[script-missing]\"\n",
        );
        assert!(run(&args(false), &global(&config)).is_err());
        let text = fs::read_to_string(tmp.path().join("formal/top.sby")).unwrap();
        assert_eq!(text, SBY);
    }

    #[test]
    fn requires_a_template() {
        let (_tmp, config) = setup("");
        let err = run(&args(false), &global(&config)).err().unwrap();
        assert!(err.to_string().contains("formal.template"));
    }

    #[test]
    fn prefix_precedence() {
        let formal = FormalConfig {
            file_prefix: Some("../output".to_string()),
            ..FormalConfig::default()
        };
        let design = DesignConfig::default();
        assert_eq!(patch_spec(&formal, &design, None).file_prefix, "../output");
        assert_eq!(patch_spec(&formal, &design, Some("x")).file_prefix, "x");
        let plain = FormalConfig::default();
        assert_eq!(patch_spec(&plain, &design, None).file_prefix, "rtl");
    }
}
