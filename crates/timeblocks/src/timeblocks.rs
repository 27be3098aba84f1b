//! Main Timeblocks struct and public query API.

use std::fs;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeblocksError};
use crate::input::LoaderConfig;
use crate::segment::{Block, Segmenter, SegmenterConfig, Threshold};
use crate::store::MeasurementStore;
use crate::summary::{
    summarize_specimen, summarize_with, BlockSummary, Palette, SpecimenSummary, TimelineData,
    TimelineOptions,
};

/// Presentation settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    /// Block colors, cycled by block index.
    pub palette: Palette,
    /// Options handed to the timeline renderer.
    pub timeline: TimelineOptions,
    /// Specimens selected when the caller does not choose any.
    /// Empty means every specimen.
    pub default_specimens: Vec<String>,
}

/// Configuration for a Timeblocks instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeblocksConfig {
    /// Loader configuration.
    pub loader: LoaderConfig,
    /// Segmenter configuration.
    pub segmenter: SegmenterConfig,
    /// Presentation configuration.
    pub presentation: PresentationConfig,
}

impl TimeblocksConfig {
    /// Read a JSON configuration file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| TimeblocksError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    pub fn with_segmenter(mut self, segmenter: SegmenterConfig) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_default_specimens<I, S>(mut self, specimens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.presentation.default_specimens = specimens.into_iter().map(Into::into).collect();
        self
    }
}

/// Query interface over one measurement source.
///
/// Every query takes its parameters explicitly and returns fresh results;
/// nothing computed for one threshold is reused for another.
pub struct Timeblocks {
    config: TimeblocksConfig,
    store: MeasurementStore,
    segmenter: Segmenter,
}

impl Timeblocks {
    /// Load a measurement file with default configuration.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, TimeblocksConfig::default())
    }

    /// Load a measurement file.
    pub fn open_with_config(path: impl AsRef<Path>, config: TimeblocksConfig) -> Result<Self> {
        let store = MeasurementStore::open_with_config(path, config.loader.clone())?;
        Ok(Self::from_store(store, config))
    }

    /// Wrap an already loaded store.
    pub fn from_store(store: MeasurementStore, config: TimeblocksConfig) -> Self {
        let segmenter = Segmenter::with_config(config.segmenter.clone());
        Self {
            config,
            store,
            segmenter,
        }
    }

    /// Distinct specimens in order of first appearance.
    pub fn list_specimens(&self) -> &IndexSet<String> {
        self.store.list_specimens()
    }

    /// Segment one specimen with a threshold in minutes.
    ///
    /// An unknown specimen yields no blocks; a negative threshold is an error.
    pub fn segment(&self, specimen: &str, threshold_minutes: f64) -> Result<Vec<Block>> {
        let threshold = Threshold::from_minutes_f64(threshold_minutes)?;
        Ok(self.segmenter.segment_specimen(&self.store, specimen, threshold))
    }

    /// Summarize one block with the configured palette.
    pub fn summarize(&self, block: &Block) -> BlockSummary {
        summarize_with(block, &self.config.presentation.palette)
    }

    /// Segment and summarize one specimen.
    pub fn summarize_specimen(&self, specimen: &str, threshold_minutes: f64) -> Result<SpecimenSummary> {
        let blocks = self.segment(specimen, threshold_minutes)?;
        Ok(summarize_specimen(
            specimen,
            &blocks,
            &self.config.presentation.palette,
        ))
    }

    /// Segment and summarize a selection of specimens.
    ///
    /// The threshold is validated before anything is segmented, so an empty
    /// selection still rejects a negative threshold. Repeated names are
    /// summarized once, in first-seen order.
    pub fn summarize_selection<S: AsRef<str>>(
        &self,
        specimens: &[S],
        threshold_minutes: f64,
    ) -> Result<Vec<SpecimenSummary>> {
        let threshold = Threshold::from_minutes_f64(threshold_minutes)?;
        let palette = &self.config.presentation.palette;
        Ok(self
            .segmenter
            .segment_all(&self.store, specimens, threshold)
            .iter()
            .map(|entry| summarize_specimen(&entry.specimen, &entry.blocks, palette))
            .collect())
    }

    /// Build timeline data for a selection of specimens.
    pub fn timeline<S: AsRef<str>>(&self, specimens: &[S], threshold_minutes: f64) -> Result<TimelineData> {
        let threshold = Threshold::from_minutes_f64(threshold_minutes)?;
        let segmented = self.segmenter.segment_all(&self.store, specimens, threshold);
        Ok(TimelineData::build(
            &segmented,
            threshold,
            &self.config.presentation.palette,
            &self.config.presentation.timeline,
        ))
    }

    /// Specimens to show when the caller has not chosen any.
    ///
    /// Configured defaults that are not in the source are skipped. With no
    /// usable defaults, every specimen is selected.
    pub fn default_selection(&self) -> Vec<String> {
        let configured: Vec<String> = self
            .config
            .presentation
            .default_specimens
            .iter()
            .filter(|s| self.store.contains_specimen(s))
            .cloned()
            .collect();

        if configured.is_empty() {
            self.store.list_specimens().iter().cloned().collect()
        } else {
            configured
        }
    }

    /// Re-read the source file. Returns whether its contents changed.
    pub fn reload(&mut self) -> Result<bool> {
        self.store.reload()
    }

    pub fn store(&self) -> &MeasurementStore {
        &self.store
    }

    pub fn config(&self) -> &TimeblocksConfig {
        &self.config
    }
}
