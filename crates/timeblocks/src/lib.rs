//! Timeblocks: specimen measurement timelines segmented into idle-gap blocks.
//!
//! Measurements are time intervals grouped by specimen. For one specimen and a
//! gap threshold, the segmenter partitions the measurements into maximal runs
//! ("blocks") whose consecutive members are at most the threshold apart.
//!
//! # Pipeline
//!
//! - **Store**: load and validate a CSV/TSV measurement table once per source
//! - **Segment**: sort one specimen's measurements and split at large gaps
//! - **Summary**: per-block counts, date ranges, labels, colors and
//!   render-ready timeline data
//!
//! # Example
//!
//! ```no_run
//! use timeblocks::Timeblocks;
//!
//! let tb = Timeblocks::open("measurements.csv").unwrap();
//! for specimen in tb.list_specimens() {
//!     for block in tb.segment(specimen, 60.0).unwrap() {
//!         println!("{} #{}: {}", specimen, block.block_index, tb.summarize(&block).label);
//!     }
//! }
//! ```

pub mod error;
pub mod input;
pub mod segment;
pub mod store;
pub mod summary;

mod timeblocks;

pub use crate::timeblocks::{PresentationConfig, Timeblocks, TimeblocksConfig};
pub use error::{Result, TimeblocksError};
pub use input::{ColumnNames, Loader, LoaderConfig, SourceMetadata};
pub use segment::{
    segment, Block, GapBaseline, SegmentCache, Segmenter, SegmenterConfig, SpecimenBlocks,
    Threshold,
};
pub use store::{Measurement, MeasurementStore};
pub use summary::{
    summarize, BlockSummary, Palette, SpecimenSummary, TimelineData, TimelineOptions,
};
