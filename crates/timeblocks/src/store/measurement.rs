//! The canonical measurement record.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One timed measurement event for a specimen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    /// Unique identifier (the `idx` column).
    pub id: i64,
    /// Specimen the measurement belongs to.
    pub specimen: String,
    /// When the measurement started.
    pub start: NaiveDateTime,
    /// When the measurement ended. Never before `start`.
    pub end: NaiveDateTime,
    /// Optional measurement label from the source.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub measurement: Option<String>,
}

impl Measurement {
    pub fn new(
        id: i64,
        specimen: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            specimen: specimen.into(),
            start,
            end,
            measurement: None,
        }
    }

    /// Attach a measurement label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.measurement = Some(label.into());
        self
    }

    /// Elapsed time between start and end.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Label shown on a timeline item; falls back to the id.
    pub fn display_label(&self) -> String {
        match &self.measurement {
            Some(label) => label.clone(),
            None => self.id.to_string(),
        }
    }
}
