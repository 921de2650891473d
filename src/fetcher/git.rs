use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use super::{run_tool, target_dir, Fetch};
use crate::error::{Error, Result};

/// Fetches a project with `git clone`, then checks out `version` if one is set.
///
/// This uses the system git command, which automatically handles:
/// - SSH keys from ~/.ssh/
/// - Git credential helpers
/// - Personal access tokens
/// - Any authentication configured in ~/.gitconfig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitFetch {
    source: String,
    destination: String,
    rename: Option<String>,
    version: Option<String>,
}

impl GitFetch {
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

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The directory the repository is cloned into.
    pub fn clone_dir(&self, destination_root: &Path) -> PathBuf {
        target_dir(destination_root, &self.destination, self.rename.as_deref())
    }

    fn run_clone(&self, target: &Path) -> Result<()> {
        // Never clear an existing directory: it may be the destination root or
        // hold other projects.
        if is_non_empty_dir(target)? {
            return Err(Error::GitClone {
                url: self.source.clone(),
                message: format!(
                    "destination {} already exists and is not empty",
                    target.display()
                ),
            });
        }

        // Create parent directory if it doesn't exist
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }

        let output = run_tool(
            "git",
            Command::new("git").args(["clone", &self.source]).arg(target),
        )?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);

            // Provide helpful error message for common auth failures
            let message = if stderr.contains("Authentication failed")
                || stderr.contains("Permission denied")
                || stderr.contains("Could not read from remote repository")
            {
                format!(
                    "Authentication failed. Make sure you have access to the repository.\n\
                    For private repos, ensure you have:\n\
                    - SSH key added to ssh-agent\n\
                    - Git credentials configured\n\
                    - Personal access token set up\n\
                    Error: {}",
                    stderr.trim()
                )
            } else {
                stderr.trim().to_string()
            };

            return Err(Error::GitClone {
                url: self.source.clone(),
                message,
            });
        }

        Ok(())
    }

    fn checkout(&self, version: &str, target: &Path) -> Result<()> {
        let output = run_tool(
            "git",
            Command::new("git")
                .arg("-C")
                .arg(target)
                .args(["checkout", "--quiet", version]),
        )?;

        if !output.status.success() {
            return Err(Error::GitCheckout {
                version: version.to_string(),
                dir: target.display().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

fn is_non_empty_dir(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }
    Ok(fs::read_dir(path)?.next().is_some())
}

impl Fetch for GitFetch {
    fn source(&self) -> &str {
        &self.source
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn fetch(&self, destination_root: &Path) -> Result<()> {
        let target = self.clone_dir(destination_root);
        debug!("git clone {} -> {}", self.source, target.display());
        self.run_clone(&target)?;

        if let Some(version) = self.version.as_deref().filter(|v| !v.is_empty()) {
            debug!("git checkout {} in {}", version, target.display());
            self.checkout(version, &target)?;
        }

        Ok(())
    }
}
