//! # Error Handling
//!
//! This module defines the centralized error type for `tasc`. It uses the
//! `thiserror` library to build a single `Error` enum covering every failure
//! mode of the library: manifest loading, the fetch providers, patch
//! application and the few I/O and parsing errors wrapped from other crates.
//!
//! ## How errors flow
//!
//! Errors raised while fetching a project or applying a patch never stop an
//! assembly run. The orchestrator records a failed fetch as the project's
//! `Failed` state and the patch runner stores the error in the patch's
//! `PatchResult`. Only manifest errors are fatal, and only to the caller that
//! asked for the manifest to be loaded.
//!
//! - **`Error`**: the main enum.
//! - **`Result<T>`**: alias for `std::result::Result<T, Error>`.

use thiserror::Error;

/// Main error type for tasc operations
#[derive(Error, Debug)]
pub enum Error {
    /// The manifest file could not be read.
    #[error("Manifest load error for {path}: {message}")]
    ManifestLoad { path: String, message: String },

    /// The manifest file was read but its content is not a valid manifest.
    #[error("Manifest parse error: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    ManifestParse {
        message: String,
        /// Optional hint for how to fix the manifest
        hint: Option<String>,
    },

    /// `git clone` failed.
    #[error("Git clone error for {url}: {message}")]
    GitClone { url: String, message: String },

    /// `git checkout` failed after a successful clone.
    #[error("Git checkout of {version} failed in {dir}: {message}")]
    GitCheckout {
        version: String,
        dir: String,
        message: String,
    },

    /// `svn co` failed.
    #[error("Subversion checkout error for {url}: {message}")]
    Svn { url: String, message: String },

    /// Downloading an archive failed.
    #[error("Download error for {url}: {message}")]
    Download { url: String, message: String },

    /// Extracting an archive failed.
    #[error("Extraction of {archive} failed: {message}")]
    Extract { archive: String, message: String },

    /// Copying a local source failed.
    #[error("Local copy from {source_path} failed: {message}")]
    LocalCopy {
        source_path: String,
        message: String,
    },

    /// Applying a patch failed.
    #[error("Patch {source_path} could not be applied to {destination}: {message}")]
    PatchApply {
        source_path: String,
        destination: String,
        message: String,
    },

    /// An external program a provider shells out to could not be started.
    #[error("Required tool '{tool}' could not be run: {message}")]
    ToolMissing { tool: String, message: String },

    /// The worker pool for concurrent fetches could not be built, or the
    /// assembly thread died before reporting its outcome.
    #[error("Scheduler error: {message}")]
    Scheduler { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression failed to compile, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
