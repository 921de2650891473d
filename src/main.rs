//! # tasc CLI
//!
//! Binary entry point for the `tasc` command-line tool.
//!
//! Its responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and output from the global flags.
//! - Running the chosen command and turning its failure into a non-zero exit.
//!
//! The assembly logic lives in the `tasc` library; the binary is a thin
//! wrapper around it.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
