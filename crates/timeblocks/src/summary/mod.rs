//! Block summaries and render-ready presentation data.

mod palette;
mod report;
mod timeline;

pub use palette::Palette;
pub use report::{summarize, summarize_specimen, summarize_with, BlockSummary, SpecimenSummary};
pub use timeline::{
    Margin, Orientation, TimelineData, TimelineGroup, TimelineItem, TimelineOptions,
    EMPTY_SELECTION_WARNING, GROUP_STYLE,
};
