//! File selection: glob pattern expansion.

use crate::error::EnumerationError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Expand `patterns` in argument order.
///
/// A path matched by several patterns is kept once, at its first position.
/// Any match that resolves to `exclude` (normally the checklist file itself)
/// is dropped. Directories are returned as matched; the digest workers skip
/// them.
pub fn enumerate(
    patterns: &[String],
    exclude: Option<&Path>,
) -> Result<Vec<PathBuf>, EnumerationError> {
    let excluded = exclude.and_then(|p| dunce::canonicalize(p).ok());
    let mut seen = HashSet::new();
    let mut matches = Vec::new();

    for pattern in patterns {
        let entries = glob::glob(pattern).map_err(|e| EnumerationError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.to_string(),
        })?;

        let mut count = 0usize;
        for entry in entries {
            let path = entry.map_err(|e| EnumerationError::Walk {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            count += 1;

            if let Some(ref excluded) = excluded {
                if dunce::canonicalize(&path).ok().as_ref() == Some(excluded) {
                    debug!(path = %path.display(), "Excluding checklist file from selection");
                    continue;
                }
            }
            if seen.insert(path.clone()) {
                matches.push(path);
            }
        }
        debug!(pattern = %pattern, matches = count, "Expanded pattern");
    }

    Ok(matches)
}
