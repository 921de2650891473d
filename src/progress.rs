//! # Progress Tracking
//!
//! The [`ProgressTracker`] records the lifecycle state of every project in an
//! assembly run and renders it as a text table. It is shared by the
//! orchestrator's blocking loop and all of its concurrent fetch tasks.
//!
//! ## Locking
//!
//! The status entries live behind a single mutex. It is held only while an
//! entry is looked up, inserted or updated, and while the entries are sorted
//! and copied for a report. Formatting and emitting a report happen after the
//! lock is released, so a slow report consumer never blocks other writers on
//! the lock itself.
//!
//! ## Report layout
//!
//! ```text
//! ______________________________________
//! | Projects  | Blocking  |     Status |
//! | --------- | ---------   ---------- |
//! | toolchain | unblocked |    success |
//! | app       | No        | processing |
//! ______________________________________
//! ```

use std::fmt;
use std::sync::mpsc::SyncSender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, trace};

use crate::project::{display_order, Project};

const NAME_HEADER: &str = "Projects";

/// Lifecycle of a project within one assembly run.
///
/// States only move forward: `Queued -> Processing -> Success | Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectState {
    Queued,
    Processing,
    Success,
    Failed,
}

impl ProjectState {
    pub fn as_str(self) -> &'static str {
        match self {
            ProjectState::Queued => "queued",
            ProjectState::Processing => "processing",
            ProjectState::Success => "success",
            ProjectState::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ProjectState::Success | ProjectState::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            ProjectState::Queued => 0,
            ProjectState::Processing => 1,
            ProjectState::Success | ProjectState::Failed => 2,
        }
    }

    /// Whether moving from `self` to `next` goes forward.
    pub fn can_advance_to(self, next: ProjectState) -> bool {
        next.rank() > self.rank()
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A project paired with its current state.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub project: Arc<Project>,
    pub state: ProjectState,
}

impl StatusEntry {
    /// The "Blocking" column, derived from the project and its state.
    pub fn blocking_label(&self) -> &'static str {
        match (self.project.blocking, self.state) {
            (true, ProjectState::Processing) => "BLOCKING",
            (true, _) => "unblocked",
            (false, _) => "No",
        }
    }
}

/// Final states of an assembly run.
///
/// `projects` has one row per tracked name, as the report shows them.
/// `outcomes` has one row per project, so a failure hidden behind a duplicate
/// name still counts. [`succeeded`](Self::succeeded), [`failed`](Self::failed)
/// and [`is_success`](Self::is_success) read `outcomes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblySummary {
    pub projects: Vec<(String, ProjectState)>,
    pub outcomes: Vec<(String, ProjectState)>,
    /// The report rendered from the final states.
    pub report: String,
}

impl AssemblySummary {
    pub fn state_of(&self, name: &str) -> Option<ProjectState> {
        self.projects
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, state)| *state)
    }

    pub fn succeeded(&self) -> Vec<&str> {
        self.with_state(ProjectState::Success)
    }

    pub fn failed(&self) -> Vec<&str> {
        self.with_state(ProjectState::Failed)
    }

    /// True when every project finished successfully.
    pub fn is_success(&self) -> bool {
        self.outcomes
            .iter()
            .all(|(_, state)| *state == ProjectState::Success)
    }

    fn with_state(&self, wanted: ProjectState) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|(_, state)| *state == wanted)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Concurrency-safe registry of project states.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    entries: Mutex<Vec<StatusEntry>>,
    reports: Option<SyncSender<String>>,
}

impl ProgressTracker {
    /// A tracker that only renders on demand.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracker that sends every [`report`](Self::report) on `reports`.
    pub fn with_reports(reports: SyncSender<String>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            reports: Some(reports),
        }
    }

    // Entries are always left consistent, so a poisoned lock is still usable.
    fn entries(&self) -> MutexGuard<'_, Vec<StatusEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queues every project whose name is not tracked yet.
    pub fn register_all(&self, projects: &[Arc<Project>]) {
        let mut entries = self.entries();
        for project in projects {
            if !entries.iter().any(|e| e.project.name == project.name) {
                entries.push(StatusEntry {
                    project: Arc::clone(project),
                    state: ProjectState::Queued,
                });
            }
        }
    }

    /// Records `state` for the project's name, inserting an entry if needed.
    ///
    /// A backward move for the same project is ignored. An update from a
    /// different project that happens to share the name overwrites the state,
    /// so duplicate names end up showing whichever update came last.
    pub fn set_state(&self, project: &Arc<Project>, state: ProjectState) {
        let mut entries = self.entries();
        match entries.iter_mut().find(|e| e.project.name == project.name) {
            Some(entry) => {
                let same_project = Arc::ptr_eq(&entry.project, project);
                if same_project && !entry.state.can_advance_to(state) {
                    debug!(
                        "ignoring {} -> {} for project {}",
                        entry.state, state, project.name
                    );
                    return;
                }
                entry.state = state;
            }
            None => entries.push(StatusEntry {
                project: Arc::clone(project),
                state,
            }),
        }
    }

    pub fn state_of(&self, name: &str) -> Option<ProjectState> {
        self.entries()
            .iter()
            .find(|e| e.project.name == name)
            .map(|e| e.state)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Sorts the entries in place and copies them out.
    fn sorted_snapshot(&self) -> Vec<StatusEntry> {
        let mut entries = self.entries();
        entries.sort_by(|a, b| display_order(&a.project, &b.project));
        entries.to_vec()
    }

    /// The current states, with one outcome per tracked name.
    pub fn summary(&self) -> AssemblySummary {
        let snapshot = self.sorted_snapshot();
        let projects: Vec<_> = snapshot
            .iter()
            .map(|e| (e.project.name.clone(), e.state))
            .collect();
        AssemblySummary {
            outcomes: projects.clone(),
            projects,
            report: render(&snapshot),
        }
    }

    /// Renders the current state as a table.
    pub fn render_report(&self) -> String {
        render(&self.sorted_snapshot())
    }

    /// Renders the current state and sends it to the report receiver.
    ///
    /// Blocks while the receiver still has an unread report. Does nothing
    /// when the tracker has no receiver or the receiver is gone.
    pub fn report(&self) {
        let Some(reports) = &self.reports else {
            return;
        };
        if reports.send(self.render_report()).is_err() {
            trace!("report receiver dropped; discarding report");
        }
    }
}

fn render(entries: &[StatusEntry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.project.name.chars().count())
        .chain(std::iter::once(NAME_HEADER.len()))
        .max()
        .unwrap_or(NAME_HEADER.len());

    let cap = format!("__{}___________________________\n", "_".repeat(width));
    let row = |name: &str, blocking: &str, status: &str| {
        format!("| {name:<width$} | {blocking:<9} | {status:>10} |\n")
    };

    let mut report = String::with_capacity(cap.len() * (entries.len() + 4));
    report.push_str(&cap);
    report.push_str(&row(NAME_HEADER, "Blocking", "Status"));
    report.push_str(&format!(
        "| {} | ---------   ---------- |\n",
        "-".repeat(width)
    ));
    for entry in entries {
        report.push_str(&row(
            &entry.project.name,
            entry.blocking_label(),
            entry.state.as_str(),
        ));
    }
    report.push_str(&cap);
    report
}
