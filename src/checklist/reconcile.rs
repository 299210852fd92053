//! Reconciliation of a fresh digest list against a recorded checklist.

use crate::checklist::ChecklistMap;
use crate::types::{DigestList, FileFailure};
use serde::Serialize;
use tracing::debug;

/// Outcome for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EntryStatus {
    /// Recorded digest matches the fresh one
    Good { digest: String },
    /// Recorded and fresh digests differ
    Mismatch { expected: String, actual: String },
    /// Present now, absent from the checklist
    Unknown { digest: String },
    /// Recorded in the checklist, absent from the current file set
    Missing { expected: String },
    /// Could not be hashed in this run
    Unreadable { reason: String },
}

impl EntryStatus {
    pub fn is_discrepancy(&self) -> bool {
        !matches!(self, EntryStatus::Good { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileEntry {
    pub path: String,
    #[serde(flatten)]
    pub status: EntryStatus,
}

/// Result of one verification pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Verification {
    pub ok: bool,
    pub entries: Vec<ReconcileEntry>,
}

impl Verification {
    pub fn discrepancies(&self) -> impl Iterator<Item = &ReconcileEntry> {
        self.entries.iter().filter(|e| e.status.is_discrepancy())
    }

    pub fn good(&self) -> impl Iterator<Item = &ReconcileEntry> {
        self.entries.iter().filter(|e| !e.status.is_discrepancy())
    }

    pub fn count(&self, pred: impl Fn(&EntryStatus) -> bool) -> usize {
        self.entries.iter().filter(|e| pred(&e.status)).count()
    }
}

/// Compare `fresh` against `recorded`.
///
/// Walks `fresh` in order, removing each path found in `recorded` whether it
/// matched or not; whatever is left afterwards is missing. A path therefore
/// appears in at most one of mismatch and missing.
pub fn reconcile(fresh: &DigestList, recorded: ChecklistMap) -> Verification {
    reconcile_with_failures(fresh, &[], recorded)
}

/// `reconcile`, plus files that could not be hashed this run.
///
/// Each failure is reported once as unreadable and consumes its checklist
/// entry, so it is not also reported as missing.
pub fn reconcile_with_failures(
    fresh: &DigestList,
    failures: &[FileFailure],
    mut recorded: ChecklistMap,
) -> Verification {
    let mut ok = true;
    let mut entries = Vec::with_capacity(fresh.len() + failures.len());

    for file in fresh {
        let status = match recorded.remove(&file.path) {
            None => EntryStatus::Unknown {
                digest: file.digest.clone(),
            },
            Some(expected) if expected != file.digest => EntryStatus::Mismatch {
                expected,
                actual: file.digest.clone(),
            },
            Some(_) => EntryStatus::Good {
                digest: file.digest.clone(),
            },
        };
        ok &= !status.is_discrepancy();
        entries.push(ReconcileEntry {
            path: file.path.clone(),
            status,
        });
    }

    for failure in failures {
        recorded.remove(&failure.path);
        ok = false;
        entries.push(ReconcileEntry {
            path: failure.path.clone(),
            status: EntryStatus::Unreadable {
                reason: format!("{} failed: {}", failure.stage, failure.reason),
            },
        });
    }

    for leftover in recorded.into_remaining() {
        ok = false;
        entries.push(ReconcileEntry {
            path: leftover.path,
            status: EntryStatus::Missing {
                expected: leftover.digest,
            },
        });
    }

    debug!(ok, entries = entries.len(), "Reconciliation finished");
    Verification { ok, entries }
}
