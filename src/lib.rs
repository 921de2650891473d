//! # tasc
//!
//! `tasc` assembles a source tree out of many projects. A YAML manifest lists
//! where each project comes from (a git or subversion repository, an archive
//! or a local path) and where it belongs in the tree. The library fetches them
//! all, reporting progress as it goes, and then applies the manifest's patches
//! to the assembled result.
//!
//! ## Quick Example
//!
//! ```
//! use std::sync::Arc;
//! use tasc::manifest::Manifest;
//! use tasc::progress::{ProgressTracker, ProjectState};
//!
//! let manifest = Manifest::parse(r#"
//! projects:
//!   - provider: git
//!     source: https://example.com/org/toolchain.git
//!     tags: [blocking, sticky]
//!   - provider: local
//!     source: /opt/src/app
//! "#).unwrap();
//! assert_eq!(manifest.projects.len(), 2);
//!
//! let projects: Vec<_> = manifest.projects.into_iter().map(Arc::new).collect();
//! let tracker = ProgressTracker::new();
//! tracker.register_all(&projects);
//! tracker.set_state(&projects[0], ProjectState::Processing);
//!
//! let report = tracker.render_report();
//! assert!(report.contains("| toolchain.git | BLOCKING  | processing |"));
//! ```
//!
//! ## Core Concepts
//!
//! - **Manifest (`manifest`)**: loads the YAML manifest, substituting `{param}`
//!   placeholders, into typed projects and patches.
//! - **Projects (`project`)**: what to fetch, with the `blocking` and `sticky`
//!   flags that shape ordering.
//! - **Providers (`fetcher`)**: the closed set of ways a project is fetched.
//! - **Progress (`progress`)**: per-project state and the rendered report.
//! - **Orchestration (`orchestrator`)**: runs blocking projects one by one,
//!   then the rest concurrently, streaming a report after every change.
//! - **Patches (`patcher`)**: applied in order once assembly is done.
//!
//! ## Execution Flow
//!
//! 1.  **Load**: read and parse the manifest.
//! 2.  **Blocking fetches**: fetch blocking projects sequentially.
//! 3.  **Concurrent fetches**: fetch every other project as its own task.
//! 4.  **Patch**: apply patches sequentially, collecting per-patch results.
//!
//! A failed fetch or patch is recorded and reported; it never stops the run.

pub mod defaults;
pub mod error;
pub mod fetcher;
pub mod manifest;
pub mod orchestrator;
pub mod output;
pub mod patcher;
pub mod progress;
pub mod project;
pub mod suggestions;

#[cfg(test)]
mod progress_proptest;
