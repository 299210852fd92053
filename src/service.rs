//! Create and verify operations.
//!
//! Both operations enumerate, hash through the digest pipeline, then either
//! persist the result or reconcile it against the persisted checklist.

use crate::checklist::{self, ParseStats, Verification};
use crate::config::ChecklistConfig;
use crate::enumerate::enumerate;
use crate::error::{ApiError, StorageError};
use crate::pipeline::hasher::ContentHasher;
use crate::pipeline::{DigestPipeline, FailurePolicy};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of `create`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    NoMatches,
    Written {
        path: PathBuf,
        entries: usize,
        skipped: usize,
    },
}

/// Result of `verify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    NoMatches,
    Verified {
        verification: Verification,
        parse: ParseStats,
        skipped: usize,
    },
}

impl VerifyOutcome {
    /// Whether the run should exit successfully.
    pub fn passed(&self) -> bool {
        match self {
            VerifyOutcome::NoMatches => true,
            VerifyOutcome::Verified { verification, .. } => verification.ok,
        }
    }
}

/// Checklist operations bound to one effective configuration.
pub struct ChecklistService {
    config: ChecklistConfig,
    pipeline: DigestPipeline,
}

impl ChecklistService {
    pub fn new(config: ChecklistConfig) -> Self {
        let pipeline = DigestPipeline::new(&config.pipeline);
        Self { config, pipeline }
    }

    /// Use a custom hasher instead of the configured algorithm.
    pub fn with_hasher(config: ChecklistConfig, hasher: Arc<dyn ContentHasher>) -> Self {
        let pipeline = DigestPipeline::with_hasher(&config.pipeline, hasher);
        Self { config, pipeline }
    }

    pub fn config(&self) -> &ChecklistConfig {
        &self.config
    }

    pub fn checklist_path(&self) -> &Path {
        &self.config.checklist.path
    }

    fn select(&self, patterns: &[String]) -> Result<Vec<PathBuf>, ApiError> {
        let paths = enumerate(patterns, Some(self.checklist_path()))?;
        if paths.is_empty() {
            warn!(patterns = ?patterns, "0 matches for the given patterns");
        } else {
            info!(matches = paths.len(), "Files selected");
        }
        Ok(paths)
    }

    /// Hash the selected files and write a new checklist.
    ///
    /// Nothing is written if any selected file cannot be hashed.
    pub fn create(&self, patterns: &[String]) -> Result<CreateOutcome, ApiError> {
        let paths = self.select(patterns)?;
        if paths.is_empty() {
            return Ok(CreateOutcome::NoMatches);
        }

        let run = self.pipeline.run(paths)?;
        if let Some(first) = run.failures.first() {
            error!(
                failed = run.failures.len(),
                "Refusing to write a checklist with unreadable files"
            );
            return Err(ApiError::UnreadableFiles {
                count: run.failures.len(),
                first: StorageError::from(first.clone()).to_string(),
            });
        }

        let path = self.checklist_path().to_path_buf();
        let entries = checklist::write_checklist(&path, &run.digests)?;
        Ok(CreateOutcome::Written {
            path,
            entries,
            skipped: run.skipped,
        })
    }

    /// Hash the selected files and reconcile them against the checklist.
    pub fn verify(&self, patterns: &[String]) -> Result<VerifyOutcome, ApiError> {
        let paths = self.select(patterns)?;
        if paths.is_empty() {
            return Ok(VerifyOutcome::NoMatches);
        }

        let run = self.pipeline.run(paths)?;
        let (recorded, parse) = checklist::load_checklist(self.checklist_path())?;

        let verification = match self.config.pipeline.on_error {
            FailurePolicy::Abort => checklist::reconcile(&run.digests, recorded),
            FailurePolicy::Report => {
                checklist::reconcile_with_failures(&run.digests, &run.failures, recorded)
            }
        };

        info!(
            ok = verification.ok,
            discrepancies = verification.discrepancies().count(),
            "Verification finished"
        );
        Ok(VerifyOutcome::Verified {
            verification,
            parse,
            skipped: run.skipped,
        })
    }
}
