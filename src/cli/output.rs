//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{ApiError, StorageError};

/// Map domain/service errors to a string for CLI output.
pub fn map_error(e: &ApiError) -> String {
    match e {
        ApiError::StorageError(StorageError::ChecklistOpen { .. }) => format!(
            "{}\nRun `chkdigest create` first or point --output at an existing checklist.",
            e
        ),
        _ => e.to_string(),
    }
}
