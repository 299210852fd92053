//! Content hashing for a single file path.
//!
//! Files are streamed through the hasher in fixed-size chunks so large files
//! never need to be held in memory.

use crate::error::StorageError;
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const READ_CHUNK: usize = 64 * 1024;

/// Computes a lowercase hex digest of a file's contents.
///
/// Implementations are shared by every worker of a run.
pub trait ContentHasher: Send + Sync {
    fn digest_file(&self, path: &Path) -> Result<String, StorageError>;
}

/// Supported digest algorithms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// 128-bit MD5, compatible with `md5sum` style checklists
    #[default]
    Md5,
    /// 256-bit BLAKE3
    Blake3,
}

impl HashAlgorithm {
    /// Hash an in-memory buffer.
    pub fn digest_bytes(&self, content: &[u8]) -> String {
        match self {
            HashAlgorithm::Md5 => hex::encode(Md5::digest(content)),
            HashAlgorithm::Blake3 => blake3::hash(content).to_hex().to_string(),
        }
    }

    fn digest_reader<R: Read>(&self, mut reader: R) -> std::io::Result<String> {
        let mut buf = vec![0u8; READ_CHUNK];
        match self {
            HashAlgorithm::Md5 => {
                let mut hasher = Md5::new();
                loop {
                    let n = reader.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buf[..n]);
                }
                Ok(hex::encode(hasher.finalize()))
            }
            HashAlgorithm::Blake3 => {
                let mut hasher = blake3::Hasher::new();
                loop {
                    let n = reader.read(&mut buf)?;
                    if n == 0 {
                        break;
                    }
                    hasher.update(&buf[..n]);
                }
                Ok(hasher.finalize().to_hex().to_string())
            }
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithm::Md5 => write!(f, "md5"),
            HashAlgorithm::Blake3 => write!(f, "blake3"),
        }
    }
}

impl ContentHasher for HashAlgorithm {
    fn digest_file(&self, path: &Path) -> Result<String, StorageError> {
        let read_err = |source| StorageError::Read {
            path: path.to_string_lossy().into_owned(),
            source,
        };
        let file = File::open(path).map_err(read_err)?;
        self.digest_reader(BufReader::new(file)).map_err(read_err)
    }
}
