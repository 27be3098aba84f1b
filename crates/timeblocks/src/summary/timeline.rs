//! Render-ready timeline data for an external chart component.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::palette::Palette;
use super::report::{summarize_specimen, SpecimenSummary};
use crate::segment::{SpecimenBlocks, Threshold};

/// Style applied to every specimen row.
pub const GROUP_STYLE: &str = "color: black; background-color: #a9a9a98F;";

/// Shown by the renderer when nothing is selected.
pub const EMPTY_SELECTION_WARNING: &str = "Select at least one specimen";

/// One measurement bar on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineItem {
    pub id: i64,
    pub content: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// Specimen row the item is drawn in.
    pub group: String,
    /// Block index within the specimen.
    pub block: usize,
    pub style: String,
}

/// One specimen row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineGroup {
    pub id: String,
    pub content: String,
    pub style: String,
}

/// Axis/item orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    pub axis: String,
    pub item: String,
}

/// Timeline margins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub axis: u32,
}

/// Display options passed through to the chart component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineOptions {
    pub selectable: bool,
    pub multiselect: bool,
    pub zoomable: bool,
    pub vertical_scroll: bool,
    pub horizontal_scroll: bool,
    pub stack: bool,
    pub height: u32,
    pub margin: Margin,
    pub group_height_mode: String,
    pub orientation: Orientation,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            selectable: true,
            multiselect: true,
            zoomable: true,
            vertical_scroll: true,
            horizontal_scroll: true,
            stack: false,
            height: 200,
            margin: Margin { axis: 5 },
            group_height_mode: "auto".to_string(),
            orientation: Orientation {
                axis: "top".to_string(),
                item: "top".to_string(),
            },
        }
    }
}

/// Everything a timeline renderer needs for one selection and threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineData {
    pub threshold_minutes: f64,
    pub items: Vec<TimelineItem>,
    pub groups: Vec<TimelineGroup>,
    pub options: TimelineOptions,
    /// Per-specimen block summaries, in selection order.
    pub specimens: Vec<SpecimenSummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

impl TimelineData {
    /// Assemble timeline data from segmented specimens.
    pub fn build(
        segmented: &[SpecimenBlocks],
        threshold: Threshold,
        palette: &Palette,
        options: &TimelineOptions,
    ) -> Self {
        let mut items = Vec::new();
        let mut groups = Vec::with_capacity(segmented.len());
        let mut specimens = Vec::with_capacity(segmented.len());

        for entry in segmented {
            groups.push(TimelineGroup {
                id: entry.specimen.clone(),
                content: entry.specimen.clone(),
                style: GROUP_STYLE.to_string(),
            });

            for block in &entry.blocks {
                let style = format!("background-color: {};", palette.color_for(block.block_index));
                for m in &block.members {
                    items.push(TimelineItem {
                        id: m.id,
                        content: format!("Specimen {}\nMeasurement {}", m.specimen, m.display_label()),
                        start: m.start,
                        end: m.end,
                        group: m.specimen.clone(),
                        block: block.block_index,
                        style: style.clone(),
                    });
                }
            }

            specimens.push(summarize_specimen(&entry.specimen, &entry.blocks, palette));
        }

        let warning = segmented
            .is_empty()
            .then(|| EMPTY_SELECTION_WARNING.to_string());

        Self {
            threshold_minutes: threshold.as_minutes_f64(),
            items,
            groups,
            options: options.clone(),
            specimens,
            warning,
        }
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
