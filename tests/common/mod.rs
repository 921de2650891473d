//! Shared test utilities for integration and E2E tests.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_source("lib/a.txt", "a");
//!     // ... test code
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::tool_available;
    pub use super::TestFixture;
}

/// Whether an external program can be started.
///
/// Tests that shell out to `git`, `tar` or `patch` return early when this is
/// false.
#[allow(dead_code)]
pub fn tool_available(tool: &str) -> bool {
    Command::new(tool)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A temporary workspace holding a manifest, local project sources and an
/// output directory.
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_source("lib/README", "lib")
///     .with_manifest("projects:\n  - provider: local\n    source: \"{manifest_dir}/lib\"\n");
///
/// fixture.command().arg("assemble").assert().success();
/// ```
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Write `tasc-manifest.yml` with the given content.
    pub fn with_manifest(self, content: &str) -> Self {
        self.temp_dir
            .child("tasc-manifest.yml")
            .write_str(content)
            .expect("Failed to write manifest");
        self
    }

    /// Add a file under `sources/`.
    pub fn with_source(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child("sources")
            .child(path)
            .write_str(content)
            .expect("Failed to write source file");
        self
    }

    /// Add a file anywhere in the fixture.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path().join("tasc-manifest.yml")
    }

    /// Directory projects are assembled into.
    pub fn output(&self) -> PathBuf {
        self.path().join("out")
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// A `tasc` command running in the fixture directory with color off and
    /// `TASC_MANIFEST` cleared.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("tasc");
        cmd.current_dir(self.path())
            .env_remove("TASC_MANIFEST")
            .env_remove("RUST_LOG")
            .arg("--color")
            .arg("never");
        cmd
    }

    /// `tasc assemble` against this fixture's manifest and output directory.
    pub fn assemble(&self) -> assert_cmd::Command {
        let mut cmd = self.command();
        cmd.arg("assemble")
            .arg("--manifest")
            .arg(self.manifest_path())
            .arg("--destination")
            .arg(self.output());
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
