//! Per-block and per-specimen summaries.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::palette::Palette;
use crate::segment::Block;

/// Render-ready statistics for one block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub specimen: String,
    pub block_index: usize,
    /// Number of measurements in the block.
    pub count: usize,
    /// Calendar date of the earliest start.
    pub date_start: NaiveDate,
    /// Calendar date of the latest end.
    pub date_end: NaiveDate,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Milliseconds from first start to last end.
    pub span_ms: i64,
    /// Human-readable description of the block.
    pub label: String,
    /// Color token from the palette.
    pub color: String,
}

impl BlockSummary {
    /// Whether the block starts and ends on the same calendar day.
    pub fn is_single_day(&self) -> bool {
        self.date_start == self.date_end
    }

    /// Time from first start to last end.
    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Summarize a block using the default palette.
pub fn summarize(block: &Block) -> BlockSummary {
    summarize_with(block, &Palette::default())
}

/// Summarize a block, coloring it from `palette`.
pub fn summarize_with(block: &Block, palette: &Palette) -> BlockSummary {
    let count = block.len();
    let date_start = block.start_range.date();
    let date_end = block.end_range.date();

    BlockSummary {
        specimen: block.specimen.clone(),
        block_index: block.block_index,
        count,
        date_start,
        date_end,
        start: block.start_range,
        end: block.end_range,
        span_ms: block.span().num_milliseconds(),
        label: block_label(count, date_start, date_end),
        color: palette.color_for(block.block_index).to_string(),
    }
}

fn block_label(count: usize, date_start: NaiveDate, date_end: NaiveDate) -> String {
    if date_start == date_end {
        format!("{} measurements on {}", count, date_start)
    } else {
        format!("{} measurements from {} to {}", count, date_start, date_end)
    }
}

/// Summary of every block for one specimen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecimenSummary {
    pub specimen: String,
    pub block_count: usize,
    pub measurement_count: usize,
    /// Earliest start across all blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_start: Option<NaiveDateTime>,
    /// Latest end across all blocks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_end: Option<NaiveDateTime>,
    pub blocks: Vec<BlockSummary>,
}

/// Summarize a specimen's blocks. An empty block list gives an empty summary.
pub fn summarize_specimen(specimen: &str, blocks: &[Block], palette: &Palette) -> SpecimenSummary {
    let summaries: Vec<BlockSummary> = blocks.iter().map(|b| summarize_with(b, palette)).collect();

    SpecimenSummary {
        specimen: specimen.to_string(),
        block_count: summaries.len(),
        measurement_count: summaries.iter().map(|s| s.count).sum(),
        first_start: summaries.iter().map(|s| s.start).min(),
        last_end: summaries.iter().map(|s| s.end).max(),
        blocks: summaries,
    }
}
