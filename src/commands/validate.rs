//! # Validate Command Implementation
//!
//! Loads a manifest the same way `assemble` does and prints what it would
//! fetch and patch. Nothing is fetched and no files are written.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use tasc::defaults::{DEFAULT_DESTINATION, DEFAULT_MANIFEST_FILENAME, DEFAULT_PARAMS};
use tasc::fetcher::Fetch;
use tasc::output::{emoji, OutputConfig};
use tasc::project::display_order;

/// Validate a tasc manifest
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the manifest file to validate
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TASC_MANIFEST",
        default_value = DEFAULT_MANIFEST_FILENAME
    )]
    pub manifest: PathBuf,

    /// JSON object of extra parameters substituted into the manifest
    #[arg(short, long, value_name = "JSON", default_value = DEFAULT_PARAMS)]
    pub params: String,
}

/// Execute the `validate` command.
pub fn execute(args: ValidateArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    println!(
        "{} Validating manifest: {}",
        emoji(&out, "🔍", "[SCAN]"),
        args.manifest.display()
    );

    let manifest = match super::load_manifest(
        &args.manifest,
        &PathBuf::from(DEFAULT_DESTINATION),
        &args.params,
    ) {
        Ok(manifest) => {
            println!("{} Manifest parsed successfully", emoji(&out, "✅", "[OK]"));
            manifest
        }
        Err(e) => {
            println!("{} Manifest parsing failed", emoji(&out, "❌", "[ERR]"));
            return Err(e);
        }
    };

    let (blocking, concurrent) = manifest.partition();
    println!("\n{} Manifest Summary:", emoji(&out, "📊", "[INFO]"));
    println!("   Projects: {}", manifest.projects.len());
    println!("   Blocking projects: {}", blocking.len());
    println!("   Concurrent projects: {}", concurrent.len());
    println!("   Patches: {}", manifest.patches.len());

    if !manifest.projects.is_empty() {
        println!("\n{} Projects:", emoji(&out, "📦", "[PROJECTS]"));
        let mut projects: Vec<_> = manifest.projects.iter().collect();
        projects.sort_by(|a, b| display_order(a, b));
        for project in projects {
            let mut flags = Vec::new();
            if project.blocking {
                flags.push("blocking");
            }
            if project.sticky {
                flags.push("sticky");
            }
            println!(
                "   {} [{}] {} -> {}{}",
                project.name,
                project.provider.kind(),
                project.provider.source(),
                display_destination(project.provider.destination()),
                if flags.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", flags.join(", "))
                }
            );
        }
    }

    if !manifest.patches.is_empty() {
        println!("\n{} Patches:", emoji(&out, "🩹", "[PATCHES]"));
        for patch in &manifest.patches {
            println!(
                "   {} {} -> {}",
                patch.name,
                patch.strategy.source(),
                patch.strategy.destination()
            );
        }
    }

    Ok(())
}

fn display_destination(destination: &str) -> &str {
    if destination.is_empty() {
        "."
    } else {
        destination
    }
}
