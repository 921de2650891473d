//! # Error Suggestions
//!
//! Helpers that build user-facing errors with hints. An error should say what
//! went wrong and how to fix it.
//!
//! ```rust,ignore
//! use tasc::suggestions;
//!
//! // Instead of:
//! anyhow::bail!("Manifest file not found: {}", path.display());
//!
//! // Use:
//! return Err(suggestions::manifest_not_found(path));
//! ```

use std::path::Path;

/// Provider names the manifest understands.
pub const KNOWN_PROVIDERS: [&str; 5] = ["git", "svn", "local", "zip", "archive"];

/// Error for a manifest path that does not exist.
pub fn manifest_not_found(path: &Path) -> anyhow::Error {
    anyhow::anyhow!(
        "Manifest file not found: {path}\n\n\
         hint: Create a tasc-manifest.yml listing your projects\n\
         hint: Use -m/--manifest to specify a different path\n\
         hint: Set TASC_MANIFEST environment variable",
        path = path.display()
    )
}

/// Error for a `--params` value that is not a JSON object of strings.
pub fn invalid_params(params: &str, error: &dyn std::fmt::Display) -> anyhow::Error {
    anyhow::anyhow!(
        "Invalid --params value: {params}\n\
         error: {error}\n\n\
         hint: Pass a JSON object, e.g. --params '{{\"version\": \"1.2.0\"}}'\n\
         hint: Refer to a parameter in the manifest as {{version}}"
    )
}

/// The known provider closest to a misspelled one, if any is close enough.
pub fn similar_provider(provider: &str) -> Option<&'static str> {
    find_similar(provider, &KNOWN_PROVIDERS)
}

/// Find a similar string from a list of candidates using edit distance.
///
/// Returns Some(candidate) if a close match is found (edit distance <= 2).
fn find_similar<'a>(input: &str, candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|&candidate| {
            let distance = edit_distance(input, candidate);
            (distance <= 2 && distance < input.len()).then_some((candidate, distance))
        })
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}

/// Levenshtein distance, computed over chars with a single rolling row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b_chars.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != *cb);
            let next = (row[j + 1] + 1).min(row[j] + 1).min(diagonal + cost);
            diagonal = row[j + 1];
            row[j + 1] = next;
        }
    }

    row[b_chars.len()]
}
