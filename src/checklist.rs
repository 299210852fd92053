//! Checklist persistence and reconciliation.
//!
//! A checklist is a newline-delimited text file of `<hex-digest> <path>`
//! lines. `codec` reads and writes that format; `reconcile` diffs a fresh
//! digest list against a loaded checklist.

pub mod codec;
pub mod reconcile;

use crate::types::{DigestList, FileDigest};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

pub use codec::{load_checklist, parse_checklist, write_checklist, ParseStats};
pub use reconcile::{reconcile, reconcile_with_failures, EntryStatus, ReconcileEntry, Verification};

/// Default checklist filename, relative to the working directory.
pub const DEFAULT_CHECKLIST_FILE: &str = "checklist.chk";

/// Checklist settings (`[checklist]` config section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistSettings {
    /// Location of the checklist file for both create and verify
    #[serde(default = "default_checklist_path")]
    pub path: PathBuf,

    /// Include "in good state" lines in verify output
    #[serde(default = "default_true")]
    pub show_good: bool,
}

fn default_checklist_path() -> PathBuf {
    PathBuf::from(DEFAULT_CHECKLIST_FILE)
}

fn default_true() -> bool {
    true
}

impl Default for ChecklistSettings {
    fn default() -> Self {
        Self {
            path: default_checklist_path(),
            show_good: true,
        }
    }
}

/// Path → digest mapping with unique keys.
///
/// Inserting an existing path is a no-op, so the first occurrence wins.
/// First-seen order is kept for reporting leftovers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistMap {
    digests: HashMap<String, String>,
    order: Vec<String>,
}

impl ChecklistMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unless `path` is already present. Returns whether it was inserted.
    pub fn insert_first(&mut self, path: String, digest: String) -> bool {
        if self.digests.contains_key(&path) {
            return false;
        }
        self.order.push(path.clone());
        self.digests.insert(path, digest);
        true
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.digests.get(path).map(String::as_str)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.digests.contains_key(path)
    }

    /// Remove `path`, marking it processed.
    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.digests.remove(path)
    }

    pub fn len(&self) -> usize {
        self.digests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digests.is_empty()
    }

    /// Remaining entries in first-seen order.
    pub fn into_remaining(mut self) -> Vec<FileDigest> {
        self.order
            .into_iter()
            .filter_map(|path| {
                self.digests
                    .remove(&path)
                    .map(|digest| FileDigest { path, digest })
            })
            .collect()
    }
}

impl From<&DigestList> for ChecklistMap {
    fn from(list: &DigestList) -> Self {
        let mut map = ChecklistMap::new();
        for entry in list {
            map.insert_first(entry.path.clone(), entry.digest.clone());
        }
        map
    }
}
