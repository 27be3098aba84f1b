//! A contiguous run of measurements for one specimen.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::store::Measurement;

/// Measurements of one specimen with no idle gap above the threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Specimen the block belongs to.
    pub specimen: String,
    /// 1-based position of the block within its specimen.
    pub block_index: usize,
    /// Members in ascending start order. Never empty.
    pub members: Vec<Measurement>,
    /// Earliest member start.
    pub start_range: NaiveDateTime,
    /// Latest member end.
    pub end_range: NaiveDateTime,
}

impl Block {
    /// Close a run of members into a block.
    ///
    /// Returns `None` for an empty run.
    pub(crate) fn from_members(block_index: usize, members: Vec<Measurement>) -> Option<Self> {
        let first = members.first()?;
        let specimen = first.specimen.clone();
        let start_range = members.iter().map(|m| m.start).min()?;
        let end_range = members.iter().map(|m| m.end).max()?;

        Some(Self {
            specimen,
            block_index,
            members,
            start_range,
            end_range,
        })
    }

    /// Number of measurements in the block.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Time covered from first start to last end.
    pub fn span(&self) -> Duration {
        self.end_range - self.start_range
    }

    pub fn first(&self) -> Option<&Measurement> {
        self.members.first()
    }

    pub fn last(&self) -> Option<&Measurement> {
        self.members.last()
    }

    /// Member ids in block order.
    pub fn ids(&self) -> Vec<i64> {
        self.members.iter().map(|m| m.id).collect()
    }
}
