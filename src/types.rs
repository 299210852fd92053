//! Core data types shared by the digest pipeline and the checklist layer.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// Digest of one file's contents.
///
/// `path` is the enumerated path as supplied by the caller; it is only ever
/// observed as a key and never rewritten. `digest` is lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDigest {
    pub path: String,
    pub digest: String,
}

impl FileDigest {
    pub fn new(path: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            digest: digest.into(),
        }
    }
}

impl fmt::Display for FileDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.digest, self.path)
    }
}

/// Digests in merger arrival order.
///
/// Append-only while the pipeline drains the merged stream, read-only after.
/// Order is not stable across runs with more than one worker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestList {
    entries: Vec<FileDigest>,
}

impl DigestList {
    pub(crate) fn push(&mut self, digest: FileDigest) {
        self.entries.push(digest);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FileDigest> {
        self.entries.iter()
    }

}

impl FromIterator<FileDigest> for DigestList {
    fn from_iter<I: IntoIterator<Item = FileDigest>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a DigestList {
    type Item = &'a FileDigest;
    type IntoIter = std::slice::Iter<'a, FileDigest>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Which step of per-file processing failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Stat,
    Read,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Stat => write!(f, "stat"),
            FailureStage::Read => write!(f, "read"),
        }
    }
}

/// A per-file I/O failure carried through the pipeline as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileFailure {
    pub path: String,
    pub stage: FailureStage,
    /// Kind of the underlying I/O error; not part of the serialized form.
    #[serde(skip, default = "other_kind")]
    pub kind: io::ErrorKind,
    pub reason: String,
}

fn other_kind() -> io::ErrorKind {
    io::ErrorKind::Other
}

impl FileFailure {
    pub fn from_io(path: impl Into<String>, stage: FailureStage, err: &io::Error) -> Self {
        Self {
            path: path.into(),
            stage,
            kind: err.kind(),
            reason: err.to_string(),
        }
    }
}

/// One record emitted by a producer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestRecord {
    Digest(FileDigest),
    /// Path exists but is not a regular file (directories, sockets, ...)
    Skipped(String),
    Failed(FileFailure),
}

/// Result of one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct DigestRun {
    pub digests: DigestList,
    pub failures: Vec<FileFailure>,
    pub skipped: usize,
}
