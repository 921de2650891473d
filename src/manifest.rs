//! # Manifest Loading
//!
//! The manifest is a YAML document listing the projects to assemble and the
//! patches to apply afterwards:
//!
//! ```yaml
//! projects:
//!   - provider: git
//!     source: https://example.com/org/toolchain.git
//!     destination: vendor
//!     version: v2.1.0
//!     tags: [blocking, sticky]
//!   - provider: local
//!     source: "{manifest_dir}/app"
//!     destination: src
//! patches:
//!   - type: file
//!     source: "{manifest_dir}/patches/app.patch"
//!     destination: "{destination_dir}/src/app/main.c"
//! ```
//!
//! Before parsing, every `{key}` in the raw text is replaced with the value of
//! the matching parameter. Placeholders with no matching parameter are left in
//! place and logged as warnings.
//!
//! `provider` defaults to `archive` (`zip` is an alias). Unknown tags are
//! ignored.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use log::{debug, warn};
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fetcher::{ArchiveFetch, GitFetch, LocalFetch, Provider, SvnFetch};
use crate::patcher::{FilePatch, Patch, PatchStrategy};
use crate::project::{infer_project_name, Project};
use crate::suggestions;

/// Parameters substituted into the manifest text, keyed by placeholder name.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default)]
    projects: Vec<ProjectSpec>,
    #[serde(default)]
    patches: Vec<PatchSpec>,
}

#[derive(Debug, Deserialize)]
struct ProjectSpec {
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    source: String,
    #[serde(default)]
    destination: String,
    #[serde(default)]
    rename: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    tags: Vec<Tag>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Tag {
    Blocking,
    Sticky,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct PatchSpec {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    source: String,
    #[serde(default)]
    destination: String,
}

impl ProjectSpec {
    fn into_project(self) -> Project {
        let name = infer_project_name(self.rename.as_deref(), &self.source);
        let blocking = self.tags.contains(&Tag::Blocking);
        let sticky = self.tags.contains(&Tag::Sticky);

        let provider = match self.provider.as_deref() {
            Some("git") => Provider::Git(GitFetch::new(
                self.source,
                self.destination,
                self.rename,
                self.version,
            )),
            Some("svn") => Provider::Svn(SvnFetch::new(
                self.source,
                self.destination,
                self.rename,
                self.version,
            )),
            Some("local") => Provider::Local(LocalFetch::new(self.source, self.destination)),
            None | Some("zip") | Some("archive") => {
                Provider::Archive(ArchiveFetch::new(self.source, self.destination))
            }
            Some(other) => {
                let did_you_mean = suggestions::similar_provider(other)
                    .map(|s| format!(" (did you mean '{s}'?)"))
                    .unwrap_or_default();
                warn!(
                    "unknown provider '{}' for {}{}, treating it as an archive",
                    other, name, did_you_mean
                );
                Provider::Archive(ArchiveFetch::new(self.source, self.destination))
            }
        };

        Project::named(name, provider)
            .blocking(blocking)
            .sticky(sticky)
    }
}

impl PatchSpec {
    fn into_patch(self) -> Patch {
        match self.kind.as_deref() {
            None | Some("file") => {}
            Some(other) => warn!("unknown patch type '{}', applying it as a file patch", other),
        }
        Patch::new(PatchStrategy::File(FilePatch::new(
            self.source,
            self.destination,
        )))
    }
}

/// Replaces every `{key}` in `text` with its value from `params`.
pub fn substitute_params(text: &str, params: &Params) -> String {
    params.iter().fold(text.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{key}}}"), value)
    })
}

/// Placeholders of the form `{name}` still present in `text`.
pub fn unresolved_placeholders(text: &str) -> Result<Vec<String>> {
    let re = Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}")?;

    let mut seen = HashSet::new();
    Ok(re
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .filter(|name| seen.insert(name.clone()))
        .collect())
}

/// Parses the `--params` JSON object into substitution parameters.
///
/// Values that are not strings are substituted with their JSON text.
pub fn parse_params(json: &str) -> Result<Params> {
    let object: BTreeMap<String, serde_json::Value> = serde_json::from_str(json)?;
    Ok(object
        .into_iter()
        .map(|(key, value)| match value {
            serde_json::Value::String(s) => (key, s),
            other => (key, other.to_string()),
        })
        .collect())
}

/// The projects and patches of one manifest, ready to run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub projects: Vec<Project>,
    pub patches: Vec<Patch>,
}

impl Manifest {
    /// Reads `path`, substitutes `params` and parses the result.
    pub fn load(path: &Path, params: &Params) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| Error::ManifestLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        debug!("loaded manifest {} ({} bytes)", path.display(), raw.len());

        let text = substitute_params(&raw, params);
        for name in unresolved_placeholders(&text)? {
            warn!("manifest {} has no value for {{{}}}", path.display(), name);
        }

        Self::parse(&text)
    }

    /// Parses manifest YAML that has already been substituted.
    ///
    /// An empty document is an empty manifest.
    pub fn parse(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let file: ManifestFile = serde_yaml::from_str(content).map_err(|e| Error::ManifestParse {
            message: e.to_string(),
            hint: Some("A manifest has only top-level 'projects' and 'patches' lists".to_string()),
        })?;

        let projects: Vec<Project> = file
            .projects
            .into_iter()
            .map(ProjectSpec::into_project)
            .collect();
        let patches = file.patches.into_iter().map(PatchSpec::into_patch).collect();

        let mut names = HashSet::new();
        for project in &projects {
            if !names.insert(project.name.as_str()) {
                warn!(
                    "project name '{}' is used more than once; those projects share one status entry",
                    project.name
                );
            }
        }

        Ok(Self { projects, patches })
    }

    /// Splits the projects into (blocking, non-blocking), keeping manifest
    /// order within each list.
    pub fn partition(&self) -> (Vec<&Project>, Vec<&Project>) {
        self.projects.iter().partition(|p| p.blocking)
    }
}
