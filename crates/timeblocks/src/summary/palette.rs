//! Deterministic block colors.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TimeblocksError};

/// Colors cycled through by block index.
const DEFAULT_COLORS: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Ordered list of color tokens assigned to blocks by index.
///
/// Block `i` (1-based) gets entry `(i - 1) % len`, so the same block index
/// always renders in the same color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

impl Palette {
    /// Build a palette from color tokens. At least one color is required.
    pub fn new(colors: Vec<String>) -> Result<Self> {
        if colors.is_empty() {
            return Err(TimeblocksError::Config(
                "palette must contain at least one color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Color token for a 1-based block index.
    pub fn color_for(&self, block_index: usize) -> &str {
        let slot = block_index.saturating_sub(1) % self.colors.len();
        &self.colors[slot]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = TimeblocksError;

    fn try_from(colors: Vec<String>) -> Result<Self> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
