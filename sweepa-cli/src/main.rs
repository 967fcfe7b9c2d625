//! sweepa CLI - dead code and dependency analysis for module-based
//! source trees.
//!
//! The engine consumes a *program snapshot*: the compiler-facade data
//! (per-file declarations, imports, re-exports, references) serialized to
//! JSON by whichever front end parsed the project. The CLI loads the
//! snapshot, runs the analysis against the project root, and prints the
//! ordered issue list. Baselines gate pull requests; the manifest fixers
//! clean up what the dependency analyzer found.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use sweepa_core::{
    create_baseline, filter_issues, init_structured_logging, load_baseline, move_dependencies,
    print_json, print_plain, remove_dependencies, save_baseline, DependencySection, ExportMode,
    IssueKind, MemoryFacade, Sweepa,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Dead code and dependency analysis for module-based source trees")]
pub struct Cli {
    /// Path to the project root
    #[arg(default_value = ".")]
    path: String,

    /// Program snapshot JSON produced by a compiler front end
    #[arg(long, value_name = "FILE")]
    program: PathBuf,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Treat malformed sweepa.toml as a fatal error
    #[arg(long)]
    strict_config: bool,

    /// Override the module-boundary export analysis mode
    #[arg(long, value_name = "off|barrels|all")]
    unused_exported: Option<String>,

    /// Filter issues against an existing baseline file
    #[arg(long, value_name = "FILE")]
    baseline: Option<PathBuf>,

    /// Write the current issue list as a new baseline and exit zero
    #[arg(long, value_name = "FILE")]
    write_baseline: Option<PathBuf>,

    /// Remove unused dependencies from the package manifest
    #[arg(long)]
    fix_unused_deps: bool,

    /// Move misplaced dependencies to their recommended section
    #[arg(long)]
    fix_misplaced: bool,

    /// Show what the fixers would change without writing
    #[arg(long)]
    fix_dry_run: bool,
}

fn parse_export_mode(raw: &str) -> Result<ExportMode> {
    match raw {
        "off" => Ok(ExportMode::Off),
        "barrels" => Ok(ExportMode::Barrels),
        "all" => Ok(ExportMode::All),
        other => anyhow::bail!("invalid --unused-exported value '{}' (off|barrels|all)", other),
    }
}

/// Reject output paths that escape the working directory.
fn validate_output_path(path: &Path) -> Result<()> {
    anyhow::ensure!(
        !path.is_absolute() || path.starts_with(std::env::current_dir()?),
        "output path must stay inside the working directory: {}",
        path.display()
    );
    anyhow::ensure!(
        !path.components().any(|c| c.as_os_str() == ".."),
        "output path must not contain '..': {}",
        path.display()
    );
    Ok(())
}

fn run(cli: Cli) -> Result<ExitCode> {
    let root = PathBuf::from(&cli.path)
        .canonicalize()
        .with_context(|| format!("cannot resolve project root '{}'", cli.path))?;

    // 1. Load the program snapshot.
    let snapshot_text = fs::read_to_string(&cli.program)
        .with_context(|| format!("cannot read program snapshot {}", cli.program.display()))?;
    let facade = MemoryFacade::from_json(&cli.program, &snapshot_text)
        .context("invalid program snapshot")?;

    // 2. Configure and run the analysis.
    let mut builder = Sweepa::new(&root, &facade)
        .strict_config(cli.strict_config)
        .load_config()?;
    if let Some(raw) = &cli.unused_exported {
        builder = builder.with_export_mode(parse_export_mode(raw)?);
    }
    let report = builder.analyze().context("analysis failed")?;

    // 3. Baseline handling.
    let mut issues = report.issues;
    if let Some(path) = &cli.write_baseline {
        validate_output_path(path)?;
        let baseline = create_baseline(&issues, &root);
        save_baseline(path, &baseline)?;
        eprintln!(
            "Baseline written to {} ({} issues).",
            path.display(),
            baseline.total_issues
        );
        return Ok(ExitCode::SUCCESS);
    }
    if let Some(path) = &cli.baseline {
        let baseline = load_baseline(path)?;
        issues = filter_issues(issues, &baseline, &root);
    }

    // 4. Manifest fixes.
    if cli.fix_unused_deps || cli.fix_misplaced {
        let manifest_path = root.join("package.json");
        if cli.fix_unused_deps {
            let names: Vec<String> = issues
                .iter()
                .filter(|i| i.kind == IssueKind::UnusedDependency)
                .map(|i| i.name.clone())
                .collect();
            if !names.is_empty() {
                let result = remove_dependencies(&manifest_path, &names, cli.fix_dry_run)?;
                eprintln!("Removed {} dependency entries.", result.removed.len());
                for error in &result.errors {
                    eprintln!("[WARN] {}", error);
                }
            }
        }
        if cli.fix_misplaced {
            let moves: Vec<(String, DependencySection)> = issues
                .iter()
                .filter(|i| i.kind == IssueKind::MisplacedDependency)
                .filter_map(|i| {
                    i.context
                        .map(|change| (i.name.clone(), change.recommended_section))
                })
                .collect();
            if !moves.is_empty() {
                let result = move_dependencies(&manifest_path, &moves, cli.fix_dry_run)?;
                eprintln!("Moved {} dependency entries.", result.moved.len());
                for error in &result.errors {
                    eprintln!("[WARN] {}", error);
                }
            }
        }
    }

    // 5. Report.
    if cli.json {
        print_json(&issues, &root);
    } else {
        eprintln!(
            "Analyzed {} files ({} reachable, {} entries), {} symbols, {} edges.",
            report.total_files,
            report.reachable_files,
            report.entry_files,
            report.symbol_count,
            report.edge_count
        );
        if !report.frameworks.is_empty() {
            eprintln!("Detected frameworks: {}.", report.frameworks.join(", "));
        }
        print_plain(&issues, &root);
    }

    if issues.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn main() -> ExitCode {
    init_structured_logging();
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_export_mode() {
        assert_eq!(parse_export_mode("off").unwrap(), ExportMode::Off);
        assert_eq!(parse_export_mode("barrels").unwrap(), ExportMode::Barrels);
        assert_eq!(parse_export_mode("all").unwrap(), ExportMode::All);
        assert!(parse_export_mode("everything").is_err());
    }

    #[test]
    fn test_validate_output_path_rejects_traversal() {
        assert!(validate_output_path(Path::new("../escape.json")).is_err());
        assert!(validate_output_path(Path::new("baseline.json")).is_ok());
        assert!(validate_output_path(Path::new("reports/baseline.json")).is_ok());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "sweepa",
            "/proj",
            "--program",
            "program.json",
            "--json",
            "--unused-exported",
            "all",
        ])
        .unwrap();
        assert_eq!(cli.path, "/proj");
        assert!(cli.json);
        assert_eq!(cli.unused_exported.as_deref(), Some("all"));
    }
}
