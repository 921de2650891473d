//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use tasc::defaults::DEFAULT_LOG_LEVEL;

use crate::commands;

/// tasc - Assemble a source tree from many projects
#[derive(Parser, Debug)]
#[command(name = "tasc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace). Overrides RUST_LOG
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch every project in the manifest, then apply its patches
    Assemble(commands::assemble::AssembleArgs),

    /// Load a manifest and summarize it without fetching anything
    Validate(commands::validate::ValidateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Commands::Assemble(args) => commands::assemble::execute(args, &self.color),
            Commands::Validate(args) => commands::validate::execute(args, &self.color),
        }
    }

    fn init_logging(&self) {
        let mut builder = match &self.log_level {
            Some(level) => {
                let mut builder = env_logger::Builder::new();
                builder.parse_filters(level);
                builder
            }
            None => env_logger::Builder::from_env(
                env_logger::Env::default().default_filter_or(DEFAULT_LOG_LEVEL),
            ),
        };

        builder.format_timestamp(None).target(env_logger::Target::Stderr);
        // A logger may already be installed when running under a test harness.
        let _ = builder.try_init();
    }
}
