//! Glob-based artifact file discovery.
//!
//! Translates an effective glob pattern into the concrete set of files
//! under a project root. Matching is done against root-relative paths;
//! results are returned as absolute paths in sorted order so boot
//! reports stay deterministic.

use std::path::{Path, PathBuf};

use globset::GlobBuilder;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{BootError, Result};

/// Expands `pattern` relative to `root` into matching file paths.
///
/// Zero matches is a valid empty result. Pattern-compile and walk
/// failures wrap into [`BootError::Discovery`], never get swallowed.
///
/// # Examples
/// ```rust,ignore
/// let files = discover_files("repositories/**/*.repository.rs", project_root)?;
/// ```
pub fn discover_files(pattern: &str, root: &Path) -> Result<Vec<PathBuf>> {
    let matcher = GlobBuilder::new(pattern)
        .literal_separator(true)
        .build()
        .map_err(|error| BootError::Discovery {
            pattern: pattern.to_string(),
            root: root.to_path_buf(),
            source: Box::new(error),
        })?
        .compile_matcher();

    let mut matches = Vec::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|error| BootError::Discovery {
            pattern: pattern.to_string(),
            root: root.to_path_buf(),
            source: Box::new(error),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(relative) {
            matches.push(entry.into_path());
        }
    }

    matches.sort();
    debug!(pattern, root = %root.display(), matched = matches.len(), "Discovered artifact files");
    Ok(matches)
}
