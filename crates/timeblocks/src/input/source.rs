//! Data source identity and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::store::Measurement;

/// Metadata about a loaded measurement source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path (empty for in-memory sources).
    pub file: String,
    /// Full path to the file, if the source was read from disk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    /// SHA-256 hash of the raw source bytes.
    pub hash: String,
    /// Source size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of measurements loaded.
    pub row_count: usize,
    /// When the source was read.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a source that has just been read.
    pub fn new(path: Option<PathBuf>, bytes: &[u8], format: String, row_count: usize) -> Self {
        let file = path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash: content_hash(bytes),
            size_bytes: bytes.len() as u64,
            format,
            row_count,
            loaded_at: Utc::now(),
        }
    }
}

impl SourceMetadata {
    /// Metadata for a table assembled in memory.
    ///
    /// The hash covers every field of every measurement, so two in-memory
    /// sources share a hash only when they hold the same rows.
    pub fn in_memory(measurements: &[Measurement]) -> Self {
        let mut hasher = Sha256::new();
        for m in measurements {
            hasher.update(
                format!(
                    "{}\x1f{}\x1f{}\x1f{}\x1f{:?}\x1e",
                    m.id, m.specimen, m.start, m.end, m.measurement
                )
                .as_bytes(),
            );
        }

        Self {
            file: String::new(),
            path: None,
            hash: format!("sha256:{:x}", hasher.finalize()),
            size_bytes: 0,
            format: "memory".to_string(),
            row_count: measurements.len(),
            loaded_at: Utc::now(),
        }
    }
}

/// Identity of a source's contents, in `sha256:<hex>` form.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{:x}", hasher.finalize())
}

/// Human-readable name for a delimiter byte.
pub(crate) fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}
