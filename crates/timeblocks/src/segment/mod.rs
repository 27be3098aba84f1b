//! Block segmentation of specimen timelines.

mod block;
mod cache;
mod segmenter;
mod threshold;

pub use block::Block;
pub use cache::SegmentCache;
pub use segmenter::{gap, segment, GapBaseline, Segmenter, SegmenterConfig, SpecimenBlocks};
pub use threshold::Threshold;
