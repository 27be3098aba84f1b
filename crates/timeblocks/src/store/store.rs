//! The measurement store: one loaded source with an explicit lifecycle.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use tracing::{debug, info};

use super::measurement::Measurement;
use crate::error::{Result, TimeblocksError};
use crate::input::{content_hash, Loader, LoaderConfig, SourceMetadata};

/// Canonical in-memory table of measurements for one data source.
///
/// The store is built once per source and only changes on an explicit
/// [`reload`](MeasurementStore::reload). Callers receive read-only views.
#[derive(Debug, Clone)]
pub struct MeasurementStore {
    measurements: Vec<Measurement>,
    specimens: IndexSet<String>,
    source: SourceMetadata,
    config: LoaderConfig,
    identity: String,
}

impl MeasurementStore {
    /// Load measurements from a file with the default loader.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, LoaderConfig::default())
    }

    /// Load measurements from a file.
    pub fn open_with_config(path: impl AsRef<Path>, config: LoaderConfig) -> Result<Self> {
        let path = path.as_ref();
        let bytes = read_source(path)?;
        let store = Self::build(Some(path.to_path_buf()), &bytes, config)?;

        info!(
            file = %store.source.file,
            rows = store.len(),
            specimens = store.specimens.len(),
            "loaded measurements"
        );
        Ok(store)
    }

    /// Load measurements from an in-memory buffer.
    pub fn from_bytes(bytes: &[u8], config: LoaderConfig) -> Result<Self> {
        Self::build(None, bytes, config)
    }

    /// Load measurements from any reader.
    pub fn from_reader(mut reader: impl Read, config: LoaderConfig) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|e| TimeblocksError::Io {
            path: PathBuf::from("<reader>"),
            source: e,
        })?;
        Self::build(None, &bytes, config)
    }

    /// Build a store directly from measurements already in memory.
    pub fn from_measurements(measurements: Vec<Measurement>) -> Self {
        let specimens = collect_specimens(&measurements);
        let source = SourceMetadata::in_memory(&measurements);
        let config = LoaderConfig::default();
        let identity = store_identity(&source, &config);
        Self {
            measurements,
            specimens,
            source,
            config,
            identity,
        }
    }

    fn build(path: Option<PathBuf>, bytes: &[u8], config: LoaderConfig) -> Result<Self> {
        let (measurements, format) = Loader::with_config(config.clone()).parse_bytes(bytes)?;
        let specimens = collect_specimens(&measurements);
        let source = SourceMetadata::new(path, bytes, format.to_string(), measurements.len());
        let identity = store_identity(&source, &config);

        Ok(Self {
            measurements,
            specimens,
            source,
            config,
            identity,
        })
    }

    /// Re-read the backing file.
    ///
    /// Returns `Ok(true)` when the contents changed and the table was
    /// replaced, `Ok(false)` when the source is byte-identical. On error the
    /// current table is left untouched.
    pub fn reload(&mut self) -> Result<bool> {
        let path = self.source.path.clone().ok_or_else(|| {
            TimeblocksError::Config("store was not loaded from a file and cannot reload".to_string())
        })?;

        let bytes = read_source(&path)?;
        if content_hash(&bytes) == self.source.hash {
            debug!(file = %self.source.file, "source unchanged, keeping loaded table");
            return Ok(false);
        }

        *self = Self::build(Some(path), &bytes, self.config.clone())?;
        info!(
            file = %self.source.file,
            rows = self.len(),
            "reloaded changed source"
        );
        Ok(true)
    }

    /// Distinct specimens in order of first appearance.
    pub fn list_specimens(&self) -> &IndexSet<String> {
        &self.specimens
    }

    /// Whether the store has any rows for `specimen`.
    pub fn contains_specimen(&self, specimen: &str) -> bool {
        self.specimens.contains(specimen)
    }

    /// All measurements for one specimen, in source order.
    ///
    /// An unknown specimen yields an empty list.
    pub fn measurements_for(&self, specimen: &str) -> Vec<&Measurement> {
        self.measurements
            .iter()
            .filter(|m| m.specimen == specimen)
            .collect()
    }

    /// Measurements whose specimen is in `specimens`, in source order.
    pub fn select<S: AsRef<str>>(&self, specimens: &[S]) -> Vec<&Measurement> {
        let wanted: IndexSet<&str> = specimens.iter().map(|s| s.as_ref()).collect();
        self.measurements
            .iter()
            .filter(|m| wanted.contains(m.specimen.as_str()))
            .collect()
    }

    /// Every measurement, in source order.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of measurements.
    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    /// Metadata about the loaded source.
    pub fn source(&self) -> &SourceMetadata {
        &self.source
    }

    /// Identity of the loaded table: the source hash combined with the
    /// loader settings it was read with.
    pub fn identity(&self) -> &str {
        &self.identity
    }
}

fn store_identity(source: &SourceMetadata, config: &LoaderConfig) -> String {
    content_hash(format!("{}\n{}", source.hash, config.fingerprint()).as_bytes())
}

fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|e| TimeblocksError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

fn collect_specimens(measurements: &[Measurement]) -> IndexSet<String> {
    measurements.iter().map(|m| m.specimen.clone()).collect()
}
