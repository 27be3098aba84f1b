//! Memoized segmentation keyed by specimen and threshold.

use std::collections::HashMap;

use tracing::debug;

use super::block::Block;
use super::segmenter::{GapBaseline, Segmenter};
use super::threshold::Threshold;
use crate::store::MeasurementStore;

type CacheKey = (String, Threshold, GapBaseline);

/// Caches segmentation results for one store.
///
/// Entries are keyed by `(specimen, threshold, baseline)`, so a result for
/// one threshold is never returned for another. The cache empties itself
/// when it is used with a store of a different identity (source contents
/// or loader settings).
#[derive(Debug, Default)]
pub struct SegmentCache {
    store_identity: Option<String>,
    entries: HashMap<CacheKey, Vec<Block>>,
    hits: usize,
    misses: usize,
}

impl SegmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks for `specimen`, segmenting on first request.
    pub fn get_or_segment(
        &mut self,
        segmenter: &Segmenter,
        store: &MeasurementStore,
        specimen: &str,
        threshold: Threshold,
    ) -> &[Block] {
        self.bind(store);

        let key = (specimen.to_string(), threshold, segmenter.config().baseline);
        if self.entries.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.entries
            .entry(key)
            .or_insert_with(|| segmenter.segment_specimen(store, specimen, threshold))
    }

    /// Drop every cached result.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.store_identity = None;
    }

    /// Number of cached segmentations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    pub fn stats(&self) -> (usize, usize) {
        (self.hits, self.misses)
    }

    fn bind(&mut self, store: &MeasurementStore) {
        let identity = store.identity();
        if self.store_identity.as_deref() != Some(identity) {
            if !self.entries.is_empty() {
                debug!(entries = self.entries.len(), "store changed, clearing segment cache");
            }
            self.entries.clear();
            self.store_identity = Some(identity.to_string());
        }
    }
}
