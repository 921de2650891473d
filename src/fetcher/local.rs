use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use super::{target_dir, Fetch};
use crate::error::{Error, Result};

/// Copies a file or a directory tree from the local filesystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFetch {
    source: String,
    destination: String,
}

impl LocalFetch {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    fn copy_error(&self, message: impl std::fmt::Display) -> Error {
        Error::LocalCopy {
            source_path: self.source.clone(),
            message: message.to_string(),
        }
    }

    fn copy_dir(&self, source: &Path, target: &Path) -> Result<()> {
        for entry in WalkDir::new(source).follow_links(true) {
            let entry = entry.map_err(|e| self.copy_error(e))?;
            let relative = entry
                .path()
                .strip_prefix(source)
                .map_err(|e| self.copy_error(e))?;
            let dest = target.join(relative);

            if entry.file_type().is_dir() {
                fs::create_dir_all(&dest).map_err(|e| {
                    self.copy_error(format!("creating '{}': {}", dest.display(), e))
                })?;
            } else {
                // fs::copy carries the permission bits over.
                fs::copy(entry.path(), &dest).map_err(|e| {
                    self.copy_error(format!("copying to '{}': {}", dest.display(), e))
                })?;
            }
        }
        Ok(())
    }

    fn copy_file(&self, source: &Path, target: &Path) -> Result<()> {
        // Copying into an existing directory keeps the source file name.
        let dest: PathBuf = match source.file_name() {
            Some(name) if target.is_dir() => target.join(name),
            _ => target.to_path_buf(),
        };
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::copy(source, &dest)
            .map_err(|e| self.copy_error(format!("copying to '{}': {}", dest.display(), e)))?;
        Ok(())
    }
}

impl Fetch for LocalFetch {
    fn source(&self) -> &str {
        &self.source
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn fetch(&self, destination_root: &Path) -> Result<()> {
        let source = Path::new(&self.source);
        let metadata = fs::metadata(source).map_err(|e| self.copy_error(e))?;
        let target = target_dir(destination_root, &self.destination, None);
        debug!("copy {} -> {}", source.display(), target.display());

        if metadata.is_dir() {
            self.copy_dir(source, &target)
        } else {
            self.copy_file(source, &target)
        }
    }
}
