//! Projects: the units of source the assembler fetches.

use std::cmp::Ordering;

use crate::fetcher::{Fetch, Provider};

/// Name used when neither a rename nor the source yields one.
pub const FALLBACK_PROJECT_NAME: &str = "No Name";

/// One fetchable unit of source code declared in the manifest.
///
/// Projects are built once by the manifest loader and never change
/// afterwards. `name` is the key the progress tracker uses; two projects with
/// the same name share a single tracker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub name: String,
    pub provider: Provider,
    /// Must finish before any non-blocking project starts.
    pub blocking: bool,
    /// Sorts first in reports and launch order. No effect on fetch ordering.
    pub sticky: bool,
}

impl Project {
    /// Creates a non-blocking, non-sticky project named after its provider's
    /// source.
    pub fn new(provider: Provider) -> Self {
        let name = infer_project_name(None, provider.source());
        Self::named(name, provider)
    }

    pub fn named(name: impl Into<String>, provider: Provider) -> Self {
        Self {
            name: name.into(),
            provider,
            blocking: false,
            sticky: false,
        }
    }

    pub fn blocking(mut self, blocking: bool) -> Self {
        self.blocking = blocking;
        self
    }

    pub fn sticky(mut self, sticky: bool) -> Self {
        self.sticky = sticky;
        self
    }
}

/// Infers a project name: the explicit rename when present, otherwise the
/// last `/`-separated segment of the source.
///
/// A source ending in `/` has an empty last segment, which yields
/// [`FALLBACK_PROJECT_NAME`].
pub fn infer_project_name(rename: Option<&str>, source: &str) -> String {
    if let Some(rename) = rename.filter(|r| !r.is_empty()) {
        return rename.to_string();
    }

    match source.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => FALLBACK_PROJECT_NAME.to_string(),
    }
}

/// Orders projects sticky first, then by name.
///
/// Used both for the rows of the progress report and for the order in which
/// blocking projects run and non-blocking projects are launched.
pub fn display_order(a: &Project, b: &Project) -> Ordering {
    b.sticky
        .cmp(&a.sticky)
        .then_with(|| a.name.cmp(&b.name))
}
