//! Default values for tasc command-line options.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::Path;

use crate::manifest::Params;

/// Manifest read when `-m/--manifest` and `TASC_MANIFEST` are both absent.
pub const DEFAULT_MANIFEST_FILENAME: &str = "tasc-manifest.yml";

/// Assembly root used when `-d/--destination` is absent.
pub const DEFAULT_DESTINATION: &str = "./";

/// `--params` value used when none is given.
pub const DEFAULT_PARAMS: &str = "{}";

/// Log level used when neither `--log-level` nor `RUST_LOG` is set.
///
/// Anything chattier would interleave with the live report.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// The parameters every manifest can use.
///
/// - `manifest_dir`: directory holding the manifest (`.` for a bare file name)
/// - `destination_dir`: the assembly root, as given on the command line
pub fn builtin_params(manifest: &Path, destination: &Path) -> Params {
    let manifest_dir = match manifest.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_string_lossy().into_owned(),
        _ => ".".to_string(),
    };

    Params::from([
        ("manifest_dir".to_string(), manifest_dir),
        (
            "destination_dir".to_string(),
            destination.to_string_lossy().into_owned(),
        ),
    ])
}
