use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::{run_tool, target_dir, Fetch};
use crate::error::{Error, Result};

/// Fetches a project with `svn checkout`, pinned to `version` when one is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvnFetch {
    source: String,
    destination: String,
    rename: Option<String>,
    version: Option<String>,
}

impl SvnFetch {
    pub fn new(
        source: impl Into<String>,
        destination: impl Into<String>,
        rename: Option<String>,
        version: Option<String>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            rename,
            version,
        }
    }

    pub fn checkout_dir(&self, destination_root: &Path) -> PathBuf {
        target_dir(destination_root, &self.destination, self.rename.as_deref())
    }

    fn command(&self, target: &Path) -> Command {
        let mut command = Command::new("svn");
        command.args(["checkout", "--non-interactive"]);
        if let Some(version) = self.version.as_deref().filter(|v| !v.is_empty()) {
            command.args(["-r", version]);
        }
        command.arg(&self.source).arg(target);
        command
    }
}

impl Fetch for SvnFetch {
    fn source(&self) -> &str {
        &self.source
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn fetch(&self, destination_root: &Path) -> Result<()> {
        let target = self.checkout_dir(destination_root);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        debug!("svn checkout {} -> {}", self.source, target.display());
        let output = run_tool("svn", &mut self.command(&target))?;
        if !output.status.success() {
            return Err(Error::Svn {
                url: self.source.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}
