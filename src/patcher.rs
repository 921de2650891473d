//! # Patch Runner
//!
//! After assembly, the manifest's patches are applied one at a time, in the
//! order they are declared. A failing patch is recorded in its
//! [`PatchResult`] and the runner moves on; nothing already applied is
//! rolled back.

use std::process::Command;

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::fetcher::run_tool;
use crate::project::infer_project_name;

/// Applies a unified diff to a file with the system `patch` tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    source: String,
    destination: String,
}

impl FilePatch {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    fn apply(&self) -> Result<()> {
        debug!("patch --input={} {}", self.source, self.destination);
        let output = run_tool(
            "patch",
            Command::new("patch")
                .arg(format!("--input={}", self.source))
                .arg(&self.destination),
        )?;

        if !output.status.success() {
            // patch reports hunk failures on stdout and fatal errors on stderr
            let mut message = String::from_utf8_lossy(&output.stderr).trim().to_string();
            if message.is_empty() {
                message = String::from_utf8_lossy(&output.stdout).trim().to_string();
            }
            return Err(Error::PatchApply {
                source_path: self.source.clone(),
                destination: self.destination.clone(),
                message,
            });
        }
        Ok(())
    }
}

/// The closed set of ways a patch can be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchStrategy {
    File(FilePatch),
}

impl PatchStrategy {
    pub fn source(&self) -> &str {
        match self {
            PatchStrategy::File(p) => p.source(),
        }
    }

    pub fn destination(&self) -> &str {
        match self {
            PatchStrategy::File(p) => p.destination(),
        }
    }

    pub fn set_source(&mut self, source: impl Into<String>) {
        match self {
            PatchStrategy::File(p) => p.set_source(source),
        }
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        match self {
            PatchStrategy::File(p) => p.set_destination(destination),
        }
    }

    /// Applies the patch once, capturing any failure in the result.
    pub fn apply(&self) -> PatchResult {
        let error = match self {
            PatchStrategy::File(p) => p.apply().err(),
        };
        PatchResult {
            error,
            strategy: self.clone(),
        }
    }
}

/// A patch declared in the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    pub name: String,
    pub strategy: PatchStrategy,
}

impl Patch {
    /// Creates a patch named after the last segment of its source path.
    pub fn new(strategy: PatchStrategy) -> Self {
        let name = infer_project_name(None, strategy.source());
        Self { name, strategy }
    }
}

/// Outcome of applying one patch.
#[derive(Debug)]
pub struct PatchResult {
    pub error: Option<Error>,
    pub strategy: PatchStrategy,
}

impl PatchResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of a patch run, in application order.
#[derive(Debug, Default)]
pub struct PatchResults(Vec<PatchResult>);

impl PatchResults {
    pub fn successes(&self) -> Vec<&PatchResult> {
        self.0.iter().filter(|r| r.is_success()).collect()
    }

    pub fn failures(&self) -> Vec<&PatchResult> {
        self.0.iter().filter(|r| !r.is_success()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PatchResult> {
        self.0.iter()
    }
}

impl From<Vec<PatchResult>> for PatchResults {
    fn from(results: Vec<PatchResult>) -> Self {
        Self(results)
    }
}

impl IntoIterator for PatchResults {
    type Item = PatchResult;
    type IntoIter = std::vec::IntoIter<PatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a PatchResults {
    type Item = &'a PatchResult;
    type IntoIter = std::slice::Iter<'a, PatchResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Applies every patch in order and collects the results.
pub fn apply_all(patches: &[Patch]) -> PatchResults {
    patches
        .iter()
        .map(|patch| {
            let result = patch.strategy.apply();
            if let Some(e) = &result.error {
                warn!("patch {} failed: {}", patch.name, e);
            }
            result
        })
        .collect::<Vec<_>>()
        .into()
}
