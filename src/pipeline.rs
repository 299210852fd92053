//! Digest pipeline: worker pool fan-out, merger fan-in, single-consumer drain.
//!
//! `DigestPipeline::run` is the only entry point. It returns the collected
//! digests as a value; nothing is accumulated outside the call.

pub mod hasher;
pub mod merge;
pub mod pool;

use crate::error::{ApiError, StorageError};
use crate::types::{DigestList, DigestRecord, DigestRun};
use hasher::{ContentHasher, HashAlgorithm};
use pool::{CancelToken, Strategy, WorkerPool};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;
use tracing::{error, info, warn};

pub use pool::shard;

/// What a run does when a file cannot be stat'ed or read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop every worker and fail the run on the first unreadable file
    #[default]
    Abort,
    /// Hash everything that can be hashed and return the failures with the result
    Report,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Report => write!(f, "report"),
        }
    }
}

/// Pipeline settings (`[pipeline]` config section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Number of concurrent digest workers
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,

    #[serde(default)]
    pub strategy: Strategy,

    #[serde(default)]
    pub algorithm: HashAlgorithm,

    #[serde(default)]
    pub on_error: FailurePolicy,

    /// Buffered records per producer stream (0 = rendezvous)
    #[serde(default)]
    pub channel_capacity: usize,
}

pub const DEFAULT_PARALLELISM: usize = 4;
pub const MAX_PARALLELISM: usize = 256;

fn default_parallelism() -> usize {
    DEFAULT_PARALLELISM
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallelism: default_parallelism(),
            strategy: Strategy::default(),
            algorithm: HashAlgorithm::default(),
            on_error: FailurePolicy::default(),
            channel_capacity: 0,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.parallelism == 0 || self.parallelism > MAX_PARALLELISM {
            return Err(format!(
                "parallelism must be between 1 and {} (got {})",
                MAX_PARALLELISM, self.parallelism
            ));
        }
        Ok(())
    }
}

/// Parallel digest computation over an enumerated path list.
pub struct DigestPipeline {
    pool: WorkerPool,
    on_error: FailurePolicy,
    channel_capacity: usize,
}

impl DigestPipeline {
    /// Build a pipeline hashing with the configured algorithm.
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_hasher(config, Arc::new(config.algorithm))
    }

    /// Build a pipeline around a caller-supplied hasher.
    pub fn with_hasher(config: &PipelineConfig, hasher: Arc<dyn ContentHasher>) -> Self {
        let pool = WorkerPool::new(config.parallelism, config.strategy, hasher)
            .with_channel_capacity(config.channel_capacity);
        Self {
            pool,
            on_error: config.on_error,
            channel_capacity: config.channel_capacity,
        }
    }

    /// Hash every regular file in `paths`.
    ///
    /// Under `FailurePolicy::Abort` the first failure cancels the run, all
    /// threads are joined, and the failure is returned as a `StorageError`.
    pub fn run(&self, paths: Vec<PathBuf>) -> Result<DigestRun, ApiError> {
        let started = Instant::now();
        let total = paths.len();
        let cancel = CancelToken::new();

        let producers = self.pool.spawn(paths, &cancel);
        let merged = merge::merge(producers.streams, self.channel_capacity);

        let mut run = DigestRun::default();
        let mut aborted = None;

        // This loop is the only writer of `run`.
        for record in merged.receiver.iter() {
            match record {
                DigestRecord::Digest(digest) => run.digests.push(digest),
                DigestRecord::Skipped(_) => run.skipped += 1,
                DigestRecord::Failed(failure) => match self.on_error {
                    FailurePolicy::Abort => {
                        error!(
                            path = %failure.path,
                            stage = %failure.stage,
                            reason = %failure.reason,
                            "Digest failed, aborting run"
                        );
                        cancel.cancel();
                        aborted = Some(failure);
                        break;
                    }
                    FailurePolicy::Report => {
                        warn!(
                            path = %failure.path,
                            stage = %failure.stage,
                            reason = %failure.reason,
                            "Digest failed"
                        );
                        run.failures.push(failure);
                    }
                },
            }
        }
        // Dropping the receiver unblocks any forwarder still waiting to send.
        drop(merged.receiver);

        join_threads(merged.forwarders, producers.handles)?;

        if let Some(failure) = aborted {
            return Err(ApiError::StorageError(StorageError::from(failure)));
        }

        info!(
            files = total,
            hashed = run.digests.len(),
            skipped = run.skipped,
            failed = run.failures.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Digest run finished"
        );
        Ok(run)
    }
}

/// Convenience wrapper: run a pipeline built from `config` and return its digests.
pub fn compute_digests(
    paths: Vec<PathBuf>,
    config: &PipelineConfig,
) -> Result<DigestList, ApiError> {
    Ok(DigestPipeline::new(config).run(paths)?.digests)
}

/// Join every forwarder and producer, then report the first panic from either set.
fn join_threads(
    forwarders: Vec<JoinHandle<()>>,
    producers: Vec<JoinHandle<()>>,
) -> Result<(), ApiError> {
    let forwarded = join_all(forwarders);
    let produced = join_all(producers);
    forwarded.and(produced)
}

fn join_all(handles: Vec<JoinHandle<()>>) -> Result<(), ApiError> {
    let mut panicked = None;
    for handle in handles {
        if let Err(payload) = handle.join() {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            panicked.get_or_insert(message);
        }
    }
    match panicked {
        Some(message) => Err(ApiError::WorkerPanicked(message)),
        None => Ok(()),
    }
}
