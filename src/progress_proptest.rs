//! Property-based tests for progress tracking and report rendering.
//!
//! These tests use proptest to generate random project sets and verify that
//! the tracker and its report keep their invariants for all of them.

#[cfg(test)]
mod proptest_tests {
    use std::collections::HashSet;
    use std::sync::Arc;

    use crate::fetcher::{LocalFetch, Provider};
    use crate::progress::{ProgressTracker, ProjectState};
    use crate::project::{infer_project_name, Project};
    use proptest::prelude::*;

    fn project(name: &str, blocking: bool, sticky: bool) -> Arc<Project> {
        Arc::new(
            Project::named(name, Provider::Local(LocalFetch::new("/src", "")))
                .blocking(blocking)
                .sticky(sticky),
        )
    }

    fn state_strategy() -> impl Strategy<Value = ProjectState> {
        prop_oneof![
            Just(ProjectState::Queued),
            Just(ProjectState::Processing),
            Just(ProjectState::Success),
            Just(ProjectState::Failed),
        ]
    }

    fn projects_strategy() -> impl Strategy<Value = Vec<(String, bool, bool)>> {
        prop::collection::vec(("[a-z]{1,6}", any::<bool>(), any::<bool>()), 0..12)
    }

    /// Data rows of a report as (name, status).
    fn rows(report: &str) -> Vec<(String, String)> {
        report
            .lines()
            .filter(|l| l.starts_with("| "))
            .skip(2)
            .map(|l| {
                let cols: Vec<_> = l.trim_matches('|').split('|').map(str::trim).collect();
                (cols[0].to_string(), cols[2].to_string())
            })
            .collect()
    }

    // ============================================================================
    // ProgressTracker property tests
    // ============================================================================

    proptest! {
        /// Property: one entry per distinct name, however many duplicates
        #[test]
        fn register_all_keeps_one_entry_per_name(specs in projects_strategy()) {
            let projects: Vec<_> = specs.iter().map(|(n, b, s)| project(n, *b, *s)).collect();
            let tracker = ProgressTracker::new();
            tracker.register_all(&projects);

            let distinct: HashSet<_> = specs.iter().map(|(n, _, _)| n.as_str()).collect();
            prop_assert_eq!(tracker.len(), distinct.len());
        }

        /// Property: rows are sticky first, then ascending by name
        #[test]
        fn report_rows_are_ordered(specs in projects_strategy()) {
            let projects: Vec<_> = specs.iter().map(|(n, b, s)| project(n, *b, *s)).collect();
            let tracker = ProgressTracker::new();
            tracker.register_all(&projects);

            // The first project registered under a name decides its flags.
            let mut sticky_of = std::collections::HashMap::new();
            for p in &projects {
                sticky_of.entry(p.name.clone()).or_insert(p.sticky);
            }

            let names: Vec<_> = rows(&tracker.render_report()).into_iter().map(|(n, _)| n).collect();
            for pair in names.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                let key_a = (!sticky_of[a], a.clone());
                let key_b = (!sticky_of[b], b.clone());
                prop_assert!(key_a < key_b, "{:?} before {:?}", a, b);
            }
        }

        /// Property: rendering twice without a state change gives the same text
        #[test]
        fn render_is_idempotent(
            specs in projects_strategy(),
            states in prop::collection::vec(state_strategy(), 12),
        ) {
            let projects: Vec<_> = specs.iter().map(|(n, b, s)| project(n, *b, *s)).collect();
            let tracker = ProgressTracker::new();
            tracker.register_all(&projects);
            for (p, state) in projects.iter().zip(&states) {
                tracker.set_state(p, *state);
            }
            prop_assert_eq!(tracker.render_report(), tracker.render_report());
        }

        /// Property: every report line has the same width
        #[test]
        fn report_lines_have_equal_width(specs in projects_strategy()) {
            let projects: Vec<_> = specs.iter().map(|(n, b, s)| project(n, *b, *s)).collect();
            let tracker = ProgressTracker::new();
            tracker.register_all(&projects);

            let report = tracker.render_report();
            let widths: HashSet<_> = report.lines().map(|l| l.chars().count()).collect();
            prop_assert_eq!(widths.len(), 1);
        }

        /// Property: a state never moves backwards for the same project
        #[test]
        fn states_only_move_forward(transitions in prop::collection::vec(state_strategy(), 1..10)) {
            let p = project("p", false, false);
            let tracker = ProgressTracker::new();
            tracker.register_all(&[Arc::clone(&p)]);

            let mut expected = ProjectState::Queued;
            for next in transitions {
                tracker.set_state(&p, next);
                if expected.can_advance_to(next) {
                    expected = next;
                }
                prop_assert_eq!(tracker.state_of("p"), Some(expected));
            }
        }
    }

    // ============================================================================
    // Name inference property tests
    // ============================================================================

    proptest! {
        /// Property: an inferred name is never empty
        #[test]
        fn inferred_name_is_never_empty(rename in proptest::option::of(".*"), source in ".*") {
            let name = infer_project_name(rename.as_deref(), &source);
            prop_assert!(!name.is_empty());
        }

        /// Property: the inferred name never contains a path separator unless
        /// it came from the rename
        #[test]
        fn inferred_name_has_no_slash(source in ".*") {
            let name = infer_project_name(None, &source);
            prop_assert!(!name.contains('/'));
        }
    }
}
