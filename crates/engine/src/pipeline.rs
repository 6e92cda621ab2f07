//! End-to-end document processing.

use serde::Serialize;
use tracing::info;

use casewise_config::{SectionConfig, Vocabulary};
use casewise_model::{rows_from_cells, Cell, HierarchyRecord, ReconciliationResult};

use crate::reconcile::{reconcile, AccuracyReport};
use crate::reconstruct::{reconstruct, DroppedRows};
use crate::repair::repair_record;

/// Everything the engine produced for one document section.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub records: Vec<HierarchyRecord>,
    pub results: Vec<ReconciliationResult>,
    pub accuracy: AccuracyReport,
    pub dropped: DroppedRows,
}

impl DocumentReport {
    /// Indices of records that carry at least one repair flag.
    pub fn flagged_records(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_flagged())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Runs the full pass: row assembly, hierarchy reconstruction, label
/// and value repair, then reconciliation against printed totals.
pub fn process_document(
    cells: Vec<Cell>,
    section: &SectionConfig,
    vocabulary: &Vocabulary,
) -> DocumentReport {
    let rows = rows_from_cells(cells);
    let row_count = rows.len();
    let mut reconstruction = reconstruct(&rows, section);

    for record in &mut reconstruction.records {
        repair_record(record, section, vocabulary);
    }

    let (results, accuracy) = reconcile(&reconstruction.groups, &reconstruction.records, section);

    let report = DocumentReport {
        records: reconstruction.records,
        results,
        accuracy,
        dropped: reconstruction.dropped,
    };

    info!(
        rows = row_count,
        records = report.records.len(),
        groups_validated = report.accuracy.groups_validated,
        groups_unvalidated = report.accuracy.groups_unvalidated,
        flagged = report.flagged_records().len(),
        dropped = report.dropped.total_rows(),
        overall_accuracy = report.accuracy.overall().unwrap_or(f64::NAN),
        "document processed"
    );

    report
}
