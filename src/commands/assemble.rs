//! # Assemble Command Implementation
//!
//! Runs a full assembly: load the manifest, fetch every project while
//! redrawing the progress report, then apply the manifest's patches.
//!
//! The command fails (non-zero exit) when any project or patch failed, after
//! everything that could run has run.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use tasc::defaults::{DEFAULT_DESTINATION, DEFAULT_MANIFEST_FILENAME, DEFAULT_PARAMS};
use tasc::manifest::Manifest;
use tasc::orchestrator::Assembler;
use tasc::output::{emoji, state_label, LiveWriter, OutputConfig};
use tasc::patcher::{apply_all, PatchResults};
use tasc::progress::{AssemblySummary, ProjectState};

/// Arguments for the assemble command
#[derive(Args, Debug)]
pub struct AssembleArgs {
    /// Path to the manifest file
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TASC_MANIFEST",
        default_value = DEFAULT_MANIFEST_FILENAME
    )]
    pub manifest: PathBuf,

    /// Directory to assemble the projects into
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_DESTINATION)]
    pub destination: PathBuf,

    /// JSON object of extra parameters substituted into the manifest
    #[arg(short, long, value_name = "JSON", default_value = DEFAULT_PARAMS)]
    pub params: String,

    /// Maximum number of non-blocking projects fetched at once (default: all)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Suppress the progress report and success messages
    #[arg(short, long)]
    pub quiet: bool,
}

/// Execute the assemble command
pub fn execute(args: AssembleArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let Manifest { projects, patches } =
        super::load_manifest(&args.manifest, &args.destination, &args.params)?;

    if !args.quiet {
        println!(
            "{} Assembling {} projects into {}",
            emoji(&out, "📦", "[ASSEMBLE]"),
            projects.len(),
            args.destination.display()
        );
    }

    let assembly = Assembler::new()
        .with_jobs(args.jobs.unwrap_or(0))
        .assemble(projects, &args.destination)?;

    let mut writer = LiveWriter::new(args.quiet);
    for report in assembly.reports() {
        writer.update(&report)?;
    }
    let summary = assembly.wait()?;
    writer.finish(&summary.report)?;

    let results = apply_all(&patches);
    print_patch_results(&results, args.quiet);
    print_failed_projects(&out, &summary);

    let failed_projects = summary.failed().len();
    let failed_patches = results.failures().len();
    if failed_projects > 0 || failed_patches > 0 {
        anyhow::bail!(
            "Assembly incomplete: {} of {} projects and {} of {} patches failed",
            failed_projects,
            summary.outcomes.len(),
            failed_patches,
            results.len()
        );
    }

    if !args.quiet {
        println!("{} Assembly complete", emoji(&out, "✅", "[OK]"));
    }
    Ok(())
}

fn print_patch_results(results: &PatchResults, quiet: bool) {
    let successes = results.successes().len();
    if successes > 0 && !quiet {
        println!("{} patches successfully applied.", successes);
    }

    let failures = results.failures();
    if !failures.is_empty() {
        println!(
            "{} patches failed to apply. Errors are listed below:",
            failures.len()
        );
        for result in failures {
            if let Some(error) = &result.error {
                println!("{}: {}", result.strategy.source(), error);
            }
        }
    }
}

fn print_failed_projects(out: &OutputConfig, summary: &AssemblySummary) {
    for name in summary.failed() {
        println!(
            "{} {}: {}",
            emoji(out, "❌", "[ERR]"),
            name,
            state_label(out, ProjectState::Failed)
        );
    }
}
