//! Worker pool: fans a path list out to concurrent digest producers.
//!
//! Two distribution strategies are available. `Sharded` splits the list into
//! contiguous, near-equal shards up front, one per worker. `Queue` feeds a
//! single bounded channel that every worker pulls from, which balances better
//! when file sizes are skewed.

use crate::pipeline::hasher::ContentHasher;
use crate::types::{DigestRecord, FailureStage, FileDigest, FileFailure};
use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{sync_channel, Receiver};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, trace};

/// How paths are distributed across workers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Static contiguous shards, one per worker
    #[default]
    Sharded,
    /// Shared bounded queue; idle workers pull the next path
    Queue,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Sharded => write!(f, "sharded"),
            Strategy::Queue => write!(f, "queue"),
        }
    }
}

/// Cooperative cancellation flag shared by every thread of a run.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Split `items` into `count` contiguous shards whose sizes differ by at most one.
///
/// The first `items.len() % count` shards receive the extra element. `count`
/// of zero is treated as one.
pub fn shard<T>(items: &[T], count: usize) -> Vec<&[T]> {
    let count = count.max(1);
    let base = items.len() / count;
    let extra = items.len() % count;

    let mut shards = Vec::with_capacity(count);
    let mut start = 0;
    for index in 0..count {
        let len = base + usize::from(index < extra);
        shards.push(&items[start..start + len]);
        start += len;
    }
    shards
}

/// Producer threads of one run and their output streams.
pub struct Producers {
    pub streams: Vec<Receiver<DigestRecord>>,
    pub handles: Vec<JoinHandle<()>>,
}

/// Fixed-size pool of digest producers.
pub struct WorkerPool {
    workers: usize,
    strategy: Strategy,
    channel_capacity: usize,
    hasher: Arc<dyn ContentHasher>,
}

impl WorkerPool {
    pub fn new(workers: usize, strategy: Strategy, hasher: Arc<dyn ContentHasher>) -> Self {
        Self {
            workers: workers.max(1),
            strategy,
            channel_capacity: 0,
            hasher,
        }
    }

    /// Slots per producer stream; 0 makes every emit a rendezvous with the merger.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    /// Workers actually started for `path_count` paths.
    pub fn effective_workers(&self, path_count: usize) -> usize {
        self.workers.min(path_count).max(1)
    }

    /// Start producers for `paths`. Each producer owns one output stream.
    pub fn spawn(&self, paths: Vec<PathBuf>, cancel: &CancelToken) -> Producers {
        let workers = self.effective_workers(paths.len());
        debug!(
            workers,
            paths = paths.len(),
            strategy = %self.strategy,
            "Starting digest workers"
        );
        match self.strategy {
            Strategy::Sharded => self.spawn_sharded(paths, workers, cancel),
            Strategy::Queue => self.spawn_queue(paths, workers, cancel),
        }
    }

    fn spawn_sharded(&self, paths: Vec<PathBuf>, workers: usize, cancel: &CancelToken) -> Producers {
        let mut streams = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for (index, slice) in shard(&paths, workers).into_iter().enumerate() {
            let (tx, rx) = sync_channel(self.channel_capacity);
            let owned: Vec<PathBuf> = slice.to_vec();
            let hasher = Arc::clone(&self.hasher);
            let cancel = cancel.clone();
            handles.push(thread::spawn(move || {
                trace!(worker = index, paths = owned.len(), "shard worker started");
                for path in &owned {
                    if cancel.is_cancelled() {
                        break;
                    }
                    if tx.send(process_path(hasher.as_ref(), path)).is_err() {
                        break;
                    }
                }
            }));
            streams.push(rx);
        }

        Producers { streams, handles }
    }

    fn spawn_queue(&self, paths: Vec<PathBuf>, workers: usize, cancel: &CancelToken) -> Producers {
        let (path_tx, path_rx) = crossbeam_channel::bounded::<PathBuf>(workers * 2);

        let mut handles = Vec::with_capacity(workers + 1);
        let feeder_cancel = cancel.clone();
        handles.push(thread::spawn(move || feed(paths, path_tx, feeder_cancel)));

        let mut streams = Vec::with_capacity(workers);
        for index in 0..workers {
            let (tx, rx) = sync_channel(self.channel_capacity);
            let hasher = Arc::clone(&self.hasher);
            let cancel = cancel.clone();
            let path_rx = path_rx.clone();
            handles.push(thread::spawn(move || {
                trace!(worker = index, "queue worker started");
                for path in path_rx.iter() {
                    if cancel.is_cancelled() {
                        break;
                    }
                    if tx.send(process_path(hasher.as_ref(), &path)).is_err() {
                        break;
                    }
                }
            }));
            streams.push(rx);
        }

        Producers { streams, handles }
    }
}

fn feed(paths: Vec<PathBuf>, queue: Sender<PathBuf>, cancel: CancelToken) {
    for path in paths {
        if cancel.is_cancelled() || queue.send(path).is_err() {
            break;
        }
    }
}

/// Stat, filter and hash a single path.
fn process_path(hasher: &dyn ContentHasher, path: &Path) -> DigestRecord {
    let path_str = path.to_string_lossy().into_owned();

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) => {
            return DigestRecord::Failed(FileFailure::from_io(path_str, FailureStage::Stat, &e))
        }
    };

    if !metadata.is_file() {
        debug!(path = %path_str, "Skipping non-regular file");
        return DigestRecord::Skipped(path_str);
    }

    match hasher.digest_file(path) {
        Ok(digest) => {
            trace!(path = %path_str, %digest, "hashed");
            DigestRecord::Digest(FileDigest::new(path_str, digest))
        }
        Err(e) => {
            let failure = match e.io_source() {
                Some(source) => FileFailure::from_io(path_str, FailureStage::Read, source),
                None => FileFailure {
                    path: path_str,
                    stage: FailureStage::Read,
                    kind: std::io::ErrorKind::Other,
                    reason: e.to_string(),
                },
            };
            DigestRecord::Failed(failure)
        }
    }
}
