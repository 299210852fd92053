//! Line codec for checklist files.
//!
//! Format: one `<hex-digest> <path>` line per entry, newline-terminated, no
//! header and no escaping. Lines are split on the first space only, so paths
//! may contain spaces but never line breaks.

use crate::checklist::ChecklistMap;
use crate::error::StorageError;
use crate::types::{DigestList, FileDigest};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Counters gathered while parsing a checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

/// Render one checklist line (without the trailing newline).
pub fn encode_line(entry: &FileDigest) -> Result<String, StorageError> {
    if entry.path.contains(['\n', '\r']) {
        return Err(StorageError::UnrepresentablePath(entry.path.clone()));
    }
    Ok(format!("{} {}", entry.digest, entry.path))
}

/// Split a line into `(digest, path)` on the first space.
///
/// Returns `None` for lines without a path field. An empty digest is kept;
/// it never matches a fresh digest.
pub fn decode_line(line: &str) -> Option<(&str, &str)> {
    let (digest, path) = line.split_once(' ')?;
    if path.is_empty() {
        return None;
    }
    Some((digest, path))
}

/// Write `digests` to `writer` in list order and flush.
pub fn write_to<W: Write>(mut writer: W, digests: &DigestList) -> Result<(), io::Error> {
    for entry in digests {
        writeln!(writer, "{} {}", entry.digest, entry.path)?;
    }
    writer.flush()
}

/// Persist `digests` to the checklist at `path`.
///
/// The content goes to a sibling `.tmp` file that is synced and renamed over
/// `path`, so a failed write leaves any existing checklist untouched.
pub fn write_checklist(path: &Path, digests: &DigestList) -> Result<usize, StorageError> {
    // Reject unrepresentable paths before touching the filesystem.
    for entry in digests {
        encode_line(entry)?;
    }

    let temp_path = temp_path_for(path)?;
    let file = File::create(&temp_path).map_err(|source| StorageError::ChecklistCreate {
        path: path.to_path_buf(),
        source,
    })?;

    let write_result = (|| -> io::Result<()> {
        let mut writer = BufWriter::new(file);
        write_to(&mut writer, digests)?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        fs::rename(&temp_path, path)
    })();

    if let Err(source) = write_result {
        let _ = fs::remove_file(&temp_path);
        return Err(StorageError::ChecklistWrite {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(path = %path.display(), entries = digests.len(), "Checklist written");
    Ok(digests.len())
}

fn temp_path_for(path: &Path) -> Result<PathBuf, StorageError> {
    let mut name = path
        .file_name()
        .ok_or_else(|| StorageError::ChecklistCreate {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "checklist path has no file name"),
        })?
        .to_os_string();
    name.push(".tmp");
    Ok(path.with_file_name(name))
}

/// Parse checklist lines from `reader`.
///
/// Malformed lines (empty, missing a field, or not UTF-8) are skipped and
/// counted. When a path repeats, the first line wins.
pub fn parse_checklist<R: BufRead>(reader: R) -> io::Result<(ChecklistMap, ParseStats)> {
    let mut map = ChecklistMap::new();
    let mut stats = ParseStats::default();

    for (index, raw) in reader.split(b'\n').enumerate() {
        let mut raw = raw?;
        stats.lines += 1;
        if raw.last() == Some(&b'\r') {
            raw.pop();
        }

        let line_no = index + 1;
        let Ok(line) = std::str::from_utf8(&raw) else {
            warn!(line = line_no, "Skipping checklist line that is not valid UTF-8");
            stats.malformed += 1;
            continue;
        };
        let Some((digest, path)) = decode_line(line) else {
            if !line.is_empty() {
                warn!(line = line_no, content = %line, "Skipping malformed checklist line");
            }
            stats.malformed += 1;
            continue;
        };

        if !map.insert_first(path.to_string(), digest.to_string()) {
            debug!(line = line_no, path = %path, "Ignoring duplicate checklist entry");
            stats.duplicates += 1;
        }
    }

    Ok((map, stats))
}

/// Open and parse the checklist at `path`. A missing or unreadable file is fatal.
pub fn load_checklist(path: &Path) -> Result<(ChecklistMap, ParseStats), StorageError> {
    let file = File::open(path).map_err(|source| StorageError::ChecklistOpen {
        path: path.to_path_buf(),
        source,
    })?;
    let (map, stats) =
        parse_checklist(BufReader::new(file)).map_err(|source| StorageError::ChecklistRead {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        path = %path.display(),
        entries = map.len(),
        malformed = stats.malformed,
        duplicates = stats.duplicates,
        "Checklist loaded"
    );
    Ok((map, stats))
}
