//! # CLI Command Implementations
//!
//! One module per `tasc` subcommand. Each holds an `Args` struct derived with
//! `clap` and an `execute` function that calls into the `tasc` library.

pub mod assemble;
pub mod validate;

use std::path::Path;

use anyhow::Result;
use tasc::defaults::builtin_params;
use tasc::manifest::{parse_params, Manifest};
use tasc::suggestions;

/// Loads the manifest with the user's `--params` plus the built-in ones.
///
/// Built-in parameters win over user parameters of the same name.
pub(crate) fn load_manifest(manifest: &Path, destination: &Path, params: &str) -> Result<Manifest> {
    if !manifest.is_file() {
        return Err(suggestions::manifest_not_found(manifest));
    }

    let mut all_params = parse_params(params).map_err(|e| suggestions::invalid_params(params, &e))?;
    all_params.extend(builtin_params(manifest, destination));

    Ok(Manifest::load(manifest, &all_params)?)
}
