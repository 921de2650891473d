//! # Assembly Orchestrator
//!
//! Drives one assembly run: every project in the manifest is fetched into the
//! destination root while a [`ProgressTracker`] records its state and emits a
//! report after each transition.
//!
//! ## Execution order
//!
//! 1.  **Register**: all projects are queued in the tracker.
//! 2.  **Partition**: projects are split into blocking and non-blocking sets,
//!     each sorted sticky first, then by name.
//! 3.  **Blocking phase**: blocking projects are fetched one after the other.
//!     Each must finish, successfully or not, before the next starts.
//! 4.  **Concurrent phase**: every non-blocking project becomes its own task
//!     on a rayon pool, launched in sorted order. Completion order is
//!     unspecified.
//! 5.  **Completion**: once every task has finished, the report channel is
//!     closed.
//!
//! Steps 1-5 run on a dedicated supervisor thread, so [`Assembler::assemble`]
//! returns immediately and the caller consumes reports while fetching is in
//! progress.
//!
//! A failed fetch never stops the run. It is logged, recorded as `Failed`, and
//! the remaining projects carry on.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use log::{debug, info, warn};

use crate::error::{Error, Result};
use crate::fetcher::Fetch;
use crate::progress::{AssemblySummary, ProgressTracker, ProjectState};
use crate::project::{display_order, Project};

/// Runs assembly with an optional cap on concurrent fetches.
#[derive(Debug, Clone, Default)]
pub struct Assembler {
    jobs: Option<usize>,
}

impl Assembler {
    /// An assembler with one concurrent task per non-blocking project.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caps the number of non-blocking fetches running at once.
    ///
    /// `0` means no cap.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = (jobs > 0).then_some(jobs);
        self
    }

    /// Starts assembling `projects` into `destination_root`.
    pub fn assemble(
        &self,
        projects: Vec<Project>,
        destination_root: impl Into<PathBuf>,
    ) -> Result<Assembly> {
        // One pending report at most; a slow reader holds the producers back.
        let (sender, reports) = mpsc::sync_channel(1);
        let root = destination_root.into();
        let jobs = self.jobs;

        let supervisor = thread::Builder::new()
            .name("tasc-assemble".to_string())
            .spawn(move || {
                let tracker = ProgressTracker::with_reports(sender);
                let projects = projects.into_iter().map(Arc::new).collect();
                run(projects, &root, &tracker, jobs)
                // The tracker, and with it the last sender, drops here.
            })?;

        Ok(Assembly {
            reports,
            supervisor,
        })
    }
}

/// A running assembly.
///
/// Iterate [`reports`](Assembly::reports) to follow progress; the iterator
/// ends once every project has reached a terminal state. Then call
/// [`wait`](Assembly::wait) for the final states.
#[derive(Debug)]
pub struct Assembly {
    reports: Receiver<String>,
    supervisor: JoinHandle<Result<AssemblySummary>>,
}

impl Assembly {
    /// Rendered progress reports, in the order they were emitted.
    pub fn reports(&self) -> impl Iterator<Item = String> + '_ {
        self.reports.iter()
    }

    /// Waits for the run to finish and returns the final project states.
    ///
    /// Unread reports are drained first, so calling this without reading the
    /// reports does not stall the run.
    pub fn wait(self) -> Result<AssemblySummary> {
        for _ in self.reports.iter() {}
        self.supervisor.join().map_err(|_| Error::Scheduler {
            message: "assembly thread panicked".to_string(),
        })?
    }
}

fn run(
    projects: Vec<Arc<Project>>,
    root: &Path,
    tracker: &ProgressTracker,
    jobs: Option<usize>,
) -> Result<AssemblySummary> {
    tracker.register_all(&projects);

    let (mut blocking, mut concurrent): (Vec<_>, Vec<_>) =
        projects.into_iter().partition(|p| p.blocking);
    blocking.sort_by(|a, b| display_order(a, b));
    concurrent.sort_by(|a, b| display_order(a, b));

    info!(
        "assembling {} blocking and {} concurrent projects into {}",
        blocking.len(),
        concurrent.len(),
        root.display()
    );

    let mut outcomes: Vec<(Arc<Project>, ProjectState)> = Vec::with_capacity(blocking.len());
    for project in &blocking {
        let state = fetch_project(project, root, tracker);
        outcomes.push((Arc::clone(project), state));
    }

    if !concurrent.is_empty() {
        let threads = jobs.unwrap_or(concurrent.len()).min(concurrent.len());
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("tasc-fetch-{i}"))
            .build()
            .map_err(|e| Error::Scheduler {
                message: e.to_string(),
            })?;
        debug!("launching {} tasks on {} threads", concurrent.len(), threads);

        let finished: Mutex<Vec<(Arc<Project>, ProjectState)>> =
            Mutex::new(Vec::with_capacity(concurrent.len()));
        pool.scope_fifo(|scope| {
            for project in &concurrent {
                let finished = &finished;
                scope.spawn_fifo(move |_| {
                    let state = fetch_project(project, root, tracker);
                    finished
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push((Arc::clone(project), state));
                });
            }
        });
        outcomes.extend(finished.into_inner().unwrap_or_else(PoisonError::into_inner));
    }

    // The tracker merges duplicate names; the outcomes keep every project.
    outcomes.sort_by(|(a, _), (b, _)| display_order(a, b));
    let mut summary = tracker.summary();
    summary.outcomes = outcomes
        .into_iter()
        .map(|(project, state)| (project.name.clone(), state))
        .collect();
    Ok(summary)
}

/// Fetches one project, recording and reporting each state change.
fn fetch_project(project: &Arc<Project>, root: &Path, tracker: &ProgressTracker) -> ProjectState {
    tracker.set_state(project, ProjectState::Processing);
    tracker.report();

    let state = match project.provider.fetch(root) {
        Ok(()) => {
            info!("fetched {}", project.name);
            ProjectState::Success
        }
        Err(e) => {
            warn!("{} failed: {}", project.name, e);
            ProjectState::Failed
        }
    };

    tracker.set_state(project, state);
    tracker.report();
    state
}
