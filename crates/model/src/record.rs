//! Reconstructed records, printed totals, and reconciliation output.

use indexmap::IndexMap;
use serde::Serialize;

/// Metric values keyed by configured column name, in configured order.
/// `None` means the cell was absent or unparseable, never zero.
pub type Metrics = IndexMap<String, Option<f64>>;

/// One reconstructed `(vendor, brand, class, metrics)` tuple.
///
/// Produced by the hierarchy reconstructor; mutated only by the repair
/// pass, and frozen once reconciliation has run. `class` stays `None`
/// when it cannot be recovered; it is never guessed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyRecord {
    pub vendor: String,
    pub brand: String,
    pub class: Option<String>,
    pub metrics: Metrics,
    /// Row indices (within their page) this record was assembled from.
    pub source_rows: Vec<u32>,
    /// Anomaly annotations added by the repair pass.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flags: Vec<RecordFlag>,
}

impl HierarchyRecord {
    /// Whether any repair heuristic flagged this record for review.
    pub fn is_flagged(&self) -> bool {
        !self.flags.is_empty()
    }
}

/// Unrepaired or heuristically-corrected anomalies on a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum RecordFlag {
    /// A label is a strict prefix of a vocabulary entry; the full value
    /// was not inferred.
    Truncated { field: String },
    /// A negative value in a non-negative metric column was cleared.
    NegativeValueCleared { column: String },
    /// A label looks duplicated but is not an exact self-concatenation,
    /// so no repair was applied.
    UnrepairedDuplication { field: String },
}

/// A printed aggregate line closing a group. Consumed only by the
/// reconciliation validator, never persisted as a data record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalRow {
    pub group_key: String,
    /// `None` entries are printed totals that failed to parse.
    pub metrics: Metrics,
}

/// Outcome of comparing one group's computed sum against its printed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconStatus {
    Match,
    Mismatch,
    /// The printed total cell was unparseable; no verdict either way.
    Unknown,
}

impl std::fmt::Display for ReconStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Match => write!(f, "match"),
            Self::Mismatch => write!(f, "mismatch"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// One `(group, metric column)` reconciliation verdict. Purely derived;
/// recomputed on every run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationResult {
    pub group_key: String,
    pub column: String,
    pub computed_sum: f64,
    pub printed_total: Option<f64>,
    pub relative_error: Option<f64>,
    pub status: ReconStatus,
}
