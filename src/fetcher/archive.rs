use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;
use url::Url;

use super::{run_tool, target_dir, Fetch};
use crate::error::{Error, Result};

/// Archive formats the archive provider can unpack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    Tar,
    TarGz,
    TarBz2,
    TarXz,
    Zip,
}

impl ArchiveFormat {
    /// Detects the format from a file name. Unknown extensions are treated
    /// as zip.
    pub fn detect(file_name: &str) -> Self {
        let name = file_name.to_ascii_lowercase();
        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            ArchiveFormat::TarGz
        } else if name.ends_with(".tar.bz2") || name.ends_with(".tbz2") {
            ArchiveFormat::TarBz2
        } else if name.ends_with(".tar.xz") || name.ends_with(".txz") {
            ArchiveFormat::TarXz
        } else if name.ends_with(".tar") {
            ArchiveFormat::Tar
        } else {
            ArchiveFormat::Zip
        }
    }

    fn extract_command(self, archive: &Path, target: &Path) -> (&'static str, Command) {
        match self {
            ArchiveFormat::Zip => {
                let mut command = Command::new("unzip");
                command.args(["-o", "-q"]).arg(archive).arg("-d").arg(target);
                ("unzip", command)
            }
            _ => {
                let flag = match self {
                    ArchiveFormat::TarGz => "-xzf",
                    ArchiveFormat::TarBz2 => "-xjf",
                    ArchiveFormat::TarXz => "-xJf",
                    _ => "-xf",
                };
                let mut command = Command::new("tar");
                command.arg(flag).arg(archive).arg("-C").arg(target);
                ("tar", command)
            }
        }
    }
}

/// Fetches a project from an archive, either downloaded over HTTP(S) or read
/// from a local path, and unpacks it into the destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFetch {
    source: String,
    destination: String,
}

impl ArchiveFetch {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }

    /// The source as a URL, when it names a remote archive.
    fn remote_url(&self) -> Option<Url> {
        Url::parse(&self.source)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
    }

    /// The archive's file name, without any URL query or fragment.
    pub fn file_name(&self) -> String {
        let path = match self.remote_url() {
            Some(url) => url.path().to_string(),
            None => self.source.clone(),
        };
        path.rsplit('/').next().unwrap_or_default().to_string()
    }

    pub fn format(&self) -> ArchiveFormat {
        ArchiveFormat::detect(&self.file_name())
    }

    fn download(&self, url: &Url) -> Result<tempfile::NamedTempFile> {
        let download_error = |message: String| Error::Download {
            url: self.source.clone(),
            message,
        };

        let mut file = tempfile::Builder::new()
            .prefix("tasc-")
            .suffix(&format!("-{}", self.file_name()))
            .tempfile()?;

        let response = ureq::get(url.as_str())
            .call()
            .map_err(|e| download_error(e.to_string()))?;
        io::copy(&mut response.into_reader(), &mut file)
            .map_err(|e| download_error(e.to_string()))?;

        Ok(file)
    }

    fn extract(&self, archive: &Path, target: &Path) -> Result<()> {
        let (tool, mut command) = self.format().extract_command(archive, target);
        debug!("{} {} -> {}", tool, archive.display(), target.display());
        let output = run_tool(tool, &mut command)?;
        if !output.status.success() {
            return Err(Error::Extract {
                archive: self.source.clone(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }

    pub fn extract_dir(&self, destination_root: &Path) -> PathBuf {
        target_dir(destination_root, &self.destination, None)
    }
}

impl Fetch for ArchiveFetch {
    fn source(&self) -> &str {
        &self.source
    }

    fn destination(&self) -> &str {
        &self.destination
    }

    fn fetch(&self, destination_root: &Path) -> Result<()> {
        let target = self.extract_dir(destination_root);
        fs::create_dir_all(&target)?;

        match self.remote_url() {
            Some(url) => {
                // The temporary file is removed when `archive` is dropped.
                let archive = self.download(&url)?;
                self.extract(archive.path(), &target)
            }
            None => {
                let archive = Path::new(&self.source);
                if !archive.is_file() {
                    return Err(Error::Extract {
                        archive: self.source.clone(),
                        message: "archive not found".to_string(),
                    });
                }
                self.extract(archive, &target)
            }
        }
    }
}
