//! Block segmentation: split a specimen's measurements at idle gaps.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::block::Block;
use super::threshold::Threshold;
use crate::store::{Measurement, MeasurementStore};

/// Which end time a gap is measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GapBaseline {
    /// End of the immediately preceding measurement in start order.
    #[default]
    PreviousEnd,
    /// Latest end seen so far in the current block. Differs from
    /// `PreviousEnd` only when a long measurement encloses later ones.
    RunningMaxEnd,
}

/// Segmenter configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Gap baseline policy.
    pub baseline: GapBaseline,
}

/// Blocks for one specimen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecimenBlocks {
    pub specimen: String,
    pub blocks: Vec<Block>,
}

/// Idle time between a measurement's end and the next one's start.
///
/// Negative when the two overlap.
pub fn gap(previous: &Measurement, next: &Measurement) -> Duration {
    next.start - previous.end
}

/// Segment with the default configuration.
///
/// `measurements` should all belong to one specimen.
pub fn segment<'a, I>(measurements: I, threshold: Threshold) -> Vec<Block>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    Segmenter::new().segment(measurements, threshold)
}

/// Partitions a specimen's measurements into blocks.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Partition `measurements` into blocks separated by gaps above `threshold`.
    ///
    /// Input order does not matter: measurements are sorted by start (ties by
    /// id) first. A gap exactly equal to the threshold does not split.
    /// Empty input yields no blocks.
    pub fn segment<'a, I>(&self, measurements: I, threshold: Threshold) -> Vec<Block>
    where
        I: IntoIterator<Item = &'a Measurement>,
    {
        let mut sorted: Vec<&Measurement> = measurements.into_iter().collect();
        sorted.sort_by(|a, b| a.start.cmp(&b.start).then(a.id.cmp(&b.id)));

        let mut iter = sorted.into_iter();
        let Some(first) = iter.next() else {
            return Vec::new();
        };

        let limit = threshold.as_duration();
        let mut blocks = Vec::new();
        let mut current = vec![first.clone()];
        let mut baseline = first.end;

        for m in iter {
            if m.start - baseline > limit {
                push_block(&mut blocks, std::mem::take(&mut current));
                baseline = m.end;
            } else {
                baseline = self.advance(baseline, m.end);
            }
            current.push(m.clone());
        }
        push_block(&mut blocks, current);

        let specimen = blocks.first().map(|b| b.specimen.as_str()).unwrap_or("");
        debug!(
            specimen,
            threshold = %threshold,
            blocks = blocks.len(),
            "segmented measurements"
        );

        blocks
    }

    /// Segment one specimen from a store.
    ///
    /// An unknown specimen is not an error; it has no blocks.
    pub fn segment_specimen(
        &self,
        store: &MeasurementStore,
        specimen: &str,
        threshold: Threshold,
    ) -> Vec<Block> {
        self.segment(store.measurements_for(specimen), threshold)
    }

    /// Segment each specimen in `specimens`, in the given order.
    ///
    /// Repeated specimens are segmented once.
    pub fn segment_all<S: AsRef<str>>(
        &self,
        store: &MeasurementStore,
        specimens: &[S],
        threshold: Threshold,
    ) -> Vec<SpecimenBlocks> {
        let mut out: Vec<SpecimenBlocks> = Vec::with_capacity(specimens.len());
        for specimen in specimens {
            let specimen = specimen.as_ref();
            if out.iter().any(|s| s.specimen == specimen) {
                continue;
            }
            out.push(SpecimenBlocks {
                specimen: specimen.to_string(),
                blocks: self.segment_specimen(store, specimen, threshold),
            });
        }
        out
    }

    fn advance(&self, baseline: NaiveDateTime, end: NaiveDateTime) -> NaiveDateTime {
        match self.config.baseline {
            GapBaseline::PreviousEnd => end,
            GapBaseline::RunningMaxEnd => baseline.max(end),
        }
    }
}

fn push_block(blocks: &mut Vec<Block>, members: Vec<Measurement>) {
    if let Some(block) = Block::from_members(blocks.len() + 1, members) {
        blocks.push(block);
    }
}
