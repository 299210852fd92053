//! Error types for checklist creation and verification.

use std::path::PathBuf;
use thiserror::Error;

/// Storage-related errors: per-file I/O and checklist persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to stat {path}: {source}")]
    Stat {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open checklist {path:?}: {source}")]
    ChecklistOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read checklist {path:?}: {source}")]
    ChecklistRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to create checklist {path:?}: {source}")]
    ChecklistCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to write checklist {path:?}: {source}")]
    ChecklistWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path cannot be stored in a checklist (contains a line break): {0:?}")]
    UnrepresentablePath(String),
}

/// File selection errors.
#[derive(Debug, Error)]
pub enum EnumerationError {
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Failed to expand pattern {pattern:?}: {reason}")]
    Walk { pattern: String, reason: String },
}

/// Operation-level errors surfaced by create and verify.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("Enumeration error: {0}")]
    EnumerationError(#[from] EnumerationError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Digest worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("{count} file(s) could not be hashed; first: {first}")]
    UnreadableFiles { count: usize, first: String },

    #[error("Report error: {0}")]
    ReportError(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::ReportError(err.to_string())
    }
}

impl StorageError {
    /// The underlying I/O error, for variants that carry one.
    pub fn io_source(&self) -> Option<&std::io::Error> {
        match self {
            StorageError::Stat { source, .. }
            | StorageError::Read { source, .. }
            | StorageError::ChecklistOpen { source, .. }
            | StorageError::ChecklistRead { source, .. }
            | StorageError::ChecklistCreate { source, .. }
            | StorageError::ChecklistWrite { source, .. } => Some(source),
            StorageError::UnrepresentablePath(_) => None,
        }
    }
}

impl From<crate::types::FileFailure> for StorageError {
    fn from(failure: crate::types::FileFailure) -> Self {
        let source = match failure.kind {
            std::io::ErrorKind::Other => std::io::Error::other(failure.reason),
            kind => std::io::Error::new(kind, failure.reason),
        };
        match failure.stage {
            crate::types::FailureStage::Stat => StorageError::Stat {
                path: failure.path,
                source,
            },
            crate::types::FailureStage::Read => StorageError::Read {
                path: failure.path,
                source,
            },
        }
    }
}
