//! # Fetch Providers
//!
//! A provider knows how to bring one project's source into the assembled tree.
//! Every provider implements the [`Fetch`] capability; the set of providers is
//! closed and modelled by the [`Provider`] enum, which the orchestrator calls
//! without knowing which variant it holds.
//!
//! | Provider  | Manifest `provider:` | External tool        |
//! |-----------|----------------------|----------------------|
//! | `Git`     | `git`                | `git`                |
//! | `Svn`     | `svn`                | `svn`                |
//! | `Archive` | `zip`, `archive`     | `tar` / `unzip`      |
//! | `Local`   | `local`              | none                 |
//!
//! Version control providers shell out to the system tools, so existing SSH
//! keys, credential helpers and proxy settings apply unchanged.

mod archive;
mod git;
mod local;
mod svn;

pub use archive::{ArchiveFetch, ArchiveFormat};
pub use git::GitFetch;
pub use local::LocalFetch;
pub use svn::SvnFetch;

use std::path::Path;
use std::process::{Command, Output};

use crate::error::{Error, Result};

/// The capability shared by every provider.
pub trait Fetch {
    /// Where the source comes from (URL or path), as written in the manifest.
    fn source(&self) -> &str;

    /// Where the source goes, relative to the destination root.
    fn destination(&self) -> &str;

    /// Fetches the source into `destination_root`.
    fn fetch(&self, destination_root: &Path) -> Result<()>;
}

/// The closed set of fetch strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provider {
    Git(GitFetch),
    Svn(SvnFetch),
    Archive(ArchiveFetch),
    Local(LocalFetch),
}

impl Provider {
    /// Short name of the provider, as used in the manifest.
    pub fn kind(&self) -> &'static str {
        match self {
            Provider::Git(_) => "git",
            Provider::Svn(_) => "svn",
            Provider::Archive(_) => "archive",
            Provider::Local(_) => "local",
        }
    }

    fn inner(&self) -> &dyn Fetch {
        match self {
            Provider::Git(f) => f,
            Provider::Svn(f) => f,
            Provider::Archive(f) => f,
            Provider::Local(f) => f,
        }
    }
}

impl Fetch for Provider {
    fn source(&self) -> &str {
        self.inner().source()
    }

    fn destination(&self) -> &str {
        self.inner().destination()
    }

    fn fetch(&self, destination_root: &Path) -> Result<()> {
        self.inner().fetch(destination_root)
    }
}

/// Runs an external tool and captures its output.
///
/// Only a failure to start the process is an error here; callers inspect the
/// exit status themselves so they can build a provider-specific error.
pub(crate) fn run_tool(tool: &str, command: &mut Command) -> Result<Output> {
    command.output().map_err(|e| Error::ToolMissing {
        tool: tool.to_string(),
        message: e.to_string(),
    })
}

/// Joins `destination` and an optional `rename` under `root`.
///
/// Empty components are skipped so that `root.join("")` never adds a
/// trailing separator.
pub(crate) fn target_dir(root: &Path, destination: &str, rename: Option<&str>) -> std::path::PathBuf {
    let mut target = root.to_path_buf();
    for part in [Some(destination), rename].into_iter().flatten() {
        if !part.is_empty() {
            target.push(part);
        }
    }
    target
}
