//! Reconciliation against printed totals.
//!
//! For every group closed by a printed TOTAL line, the validator sums
//! the reconstructed detail records per metric column and compares the
//! sum to the printed figure. Mismatches are measured and reported,
//! never auto-corrected: the printed total itself can be OCR-corrupted,
//! so forcing agreement would destroy the one independent check the
//! document offers.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use casewise_config::SectionConfig;
use casewise_model::{HierarchyRecord, ReconStatus, ReconciliationResult};

use crate::reconstruct::Group;

/// Match/mismatch tallies for one metric column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ColumnAccuracy {
    pub matched: usize,
    pub mismatched: usize,
    pub unknown: usize,
}

impl ColumnAccuracy {
    /// Matching groups over decided groups; `None` when nothing was
    /// decided (all totals unparseable). Unknown verdicts are excluded
    /// from the denominator: an unreadable printed total says nothing
    /// about extraction quality, so it neither helps nor hurts the
    /// figure.
    pub fn accuracy(&self) -> Option<f64> {
        let decided = self.matched + self.mismatched;
        (decided > 0).then(|| self.matched as f64 / decided as f64)
    }
}

/// Per-column and overall accuracy for one document.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccuracyReport {
    pub per_column: IndexMap<String, ColumnAccuracy>,
    /// Groups closed by a printed total.
    pub groups_validated: usize,
    /// Trailing groups that never saw a total line.
    pub groups_unvalidated: usize,
}

impl AccuracyReport {
    /// Overall accuracy across all columns and groups.
    pub fn overall(&self) -> Option<f64> {
        let mut tally = ColumnAccuracy::default();
        for column in self.per_column.values() {
            tally.matched += column.matched;
            tally.mismatched += column.mismatched;
            tally.unknown += column.unknown;
        }
        tally.accuracy()
    }
}

/// Relative error with the spec'd guard denominator: small printed
/// totals do not inflate the error of small absolute deviations.
fn relative_error(computed: f64, printed: f64) -> f64 {
    (computed - printed).abs() / printed.abs().max(1.0)
}

/// Reconciles every total-closed group, one result per
/// `(group, metric column)` pair.
pub fn reconcile(
    groups: &[Group],
    records: &[HierarchyRecord],
    section: &SectionConfig,
) -> (Vec<ReconciliationResult>, AccuracyReport) {
    let mut results = Vec::new();
    let mut report = AccuracyReport {
        per_column: section
            .metric_columns
            .iter()
            .map(|c| (c.clone(), ColumnAccuracy::default()))
            .collect(),
        ..AccuracyReport::default()
    };

    for group in groups {
        let Some(total) = &group.total else {
            report.groups_unvalidated += 1;
            continue;
        };
        report.groups_validated += 1;

        for column in &section.metric_columns {
            // Null detail values count as zero for summation only; the
            // record itself keeps them null.
            let computed_sum: f64 = group
                .records
                .iter()
                .filter_map(|&i| records.get(i))
                .map(|r| r.metrics.get(column).copied().flatten().unwrap_or(0.0))
                .sum();
            let printed_total = total.metrics.get(column).copied().flatten();

            let (relative, status) = match printed_total {
                // Unparseable printed total: no verdict, not a false match.
                None => (None, ReconStatus::Unknown),
                Some(printed) => {
                    let rel = relative_error(computed_sum, printed);
                    let status = if group.records.is_empty() {
                        // A total with zero detail records is a parsing
                        // gap upstream; report it as a mismatch.
                        ReconStatus::Mismatch
                    } else if rel > section.tolerance {
                        ReconStatus::Mismatch
                    } else {
                        ReconStatus::Match
                    };
                    (Some(rel), status)
                }
            };

            if status == ReconStatus::Mismatch {
                warn!(
                    group = %group.key,
                    column = %column,
                    computed_sum,
                    printed_total = printed_total.unwrap_or(f64::NAN),
                    "reconciliation mismatch"
                );
            }

            let tally = report.per_column.entry(column.clone()).or_default();
            match status {
                ReconStatus::Match => tally.matched += 1,
                ReconStatus::Mismatch => tally.mismatched += 1,
                ReconStatus::Unknown => tally.unknown += 1,
            }

            results.push(ReconciliationResult {
                group_key: group.key.clone(),
                column: column.clone(),
                computed_sum,
                printed_total,
                relative_error: relative,
                status,
            });
        }
    }

    (results, report)
}
