//! Column boundary tables.
//!
//! A boundary table maps horizontal position ranges to semantic column
//! names. The ranges are empirically tuned per report layout and are
//! brittle by nature, so validation is strict: entries must be
//! monotonically increasing and non-overlapping within one table. Gaps
//! between entries are fine; cells landing in a gap are unassigned.

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// One `[x_min, x_max)` range assigned to a named column.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ColumnBound {
    pub column: String,
    pub x_min: f64,
    pub x_max: f64,
}

impl ColumnBound {
    /// Whether a position falls inside this range.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.x_min && x < self.x_max
    }

    /// Length of the intersection between this range and `[lo, hi]`.
    pub fn overlap(&self, lo: f64, hi: f64) -> f64 {
        (hi.min(self.x_max) - lo.max(self.x_min)).max(0.0)
    }
}

/// An ordered, non-overlapping set of column ranges for one table layout.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ColumnBoundaryTable {
    pub bounds: Vec<ColumnBound>,
}

impl ColumnBoundaryTable {
    pub fn new(bounds: Vec<ColumnBound>) -> Self {
        Self { bounds }
    }

    /// The bound for a named column, if configured.
    pub fn bound(&self, column: &str) -> Option<&ColumnBound> {
        self.bounds.iter().find(|b| b.column == column)
    }

    /// Validates ordering and disjointness. `section` only labels errors.
    pub fn validate(&self, section: &str) -> Result<()> {
        for bound in &self.bounds {
            if bound.x_min >= bound.x_max {
                return Err(ConfigError::EmptyRange {
                    section: section.to_string(),
                    column: bound.column.clone(),
                    x_min: bound.x_min,
                    x_max: bound.x_max,
                });
            }
        }
        for pair in self.bounds.windows(2) {
            if pair[1].x_min < pair[0].x_max {
                return Err(ConfigError::OverlappingRanges {
                    section: section.to_string(),
                    left: pair[0].column.clone(),
                    right: pair[1].column.clone(),
                });
            }
        }
        for (i, bound) in self.bounds.iter().enumerate() {
            if self.bounds[..i].iter().any(|b| b.column == bound.column) {
                return Err(ConfigError::DuplicateColumn {
                    section: section.to_string(),
                    column: bound.column.clone(),
                });
            }
        }
        Ok(())
    }
}
