//! Hierarchy reconstruction.
//!
//! A single sequential pass over role-labeled rows in document order.
//! The only carried state is the current vendor label (grown by
//! continuation lines) and the current class label (inherited across
//! brand rows until replaced or the group closes). Order matters:
//! this pass must never be parallelized within one document.

use serde::Serialize;
use tracing::{debug, warn};

use casewise_config::SectionConfig;
use casewise_model::{HierarchyRecord, Row, TotalRow};

use crate::columns::row_metrics;
use crate::roles::{classify, RowFeatures, RowRole};

/// Records accumulated under one closing TOTAL line. `records` holds
/// indices into the document's record vector.
#[derive(Debug, Clone, Serialize)]
pub struct Group {
    pub key: String,
    pub records: Vec<usize>,
    /// The printed aggregate closing this group; `None` when the
    /// document ended (or a new vendor began) before one appeared.
    pub total: Option<TotalRow>,
}

/// Rows and cells dropped during the pass, by reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DroppedRows {
    /// Repeated page furniture.
    pub header_rows: usize,
    /// Unclassifiable rows.
    pub junk_rows: usize,
    /// Brand rows seen before any vendor label.
    pub orphan_rows: usize,
    /// Cells falling outside every configured range.
    pub unassigned_cells: usize,
}

impl DroppedRows {
    pub fn total_rows(&self) -> usize {
        self.header_rows + self.junk_rows + self.orphan_rows
    }
}

/// Output of the reconstruction pass, before repair and reconciliation.
#[derive(Debug)]
pub struct Reconstruction {
    pub records: Vec<HierarchyRecord>,
    pub groups: Vec<Group>,
    pub dropped: DroppedRows,
}

/// Runs the reconstruction pass over assembled rows.
pub fn reconstruct(rows: &[Row], section: &SectionConfig) -> Reconstruction {
    let mut records: Vec<HierarchyRecord> = Vec::new();
    let mut groups: Vec<Group> = Vec::new();
    let mut dropped = DroppedRows::default();

    let mut prev_role: Option<RowRole> = None;
    let mut current_vendor: Option<String> = None;
    let mut current_class: Option<String> = None;
    let mut open_records: Vec<usize> = Vec::new();

    for row in rows {
        let features = RowFeatures::extract(row, section);
        dropped.unassigned_cells += features.unassigned_cells;
        let role = classify(prev_role, &features, section);
        prev_role = Some(role);

        match role {
            RowRole::Header => dropped.header_rows += 1,
            RowRole::Junk => {
                debug!(page = row.page, row = row.row_index, "dropping junk row");
                dropped.junk_rows += 1;
            }
            RowRole::Vendor => {
                // A new vendor implicitly closes any unterminated group.
                close_group(&mut groups, &mut open_records, current_vendor.take(), None);
                current_vendor = Some(features.label);
                current_class = None;
            }
            RowRole::Continuation => match current_vendor.as_mut() {
                // Wrapped vendor name: append with a single space, token
                // order preserved, no reordering or inner trimming.
                Some(vendor) => {
                    vendor.push(' ');
                    vendor.push_str(&features.label);
                }
                None => {
                    warn!(
                        page = row.page,
                        row = row.row_index,
                        "continuation row without a vendor, treating as vendor"
                    );
                    current_vendor = Some(features.label);
                }
            },
            RowRole::Brand => {
                let Some(vendor) = current_vendor.clone() else {
                    warn!(
                        page = row.page,
                        row = row.row_index,
                        label = %features.label,
                        "brand row before any vendor, dropping"
                    );
                    dropped.orphan_rows += 1;
                    continue;
                };
                if !features.class_text.is_empty() {
                    current_class = Some(features.class_text.clone());
                }
                let metrics = row_metrics(row, section, &section.detail_bounds);
                open_records.push(records.len());
                records.push(HierarchyRecord {
                    vendor,
                    brand: features.label,
                    class: current_class.clone(),
                    metrics,
                    source_rows: vec![row.row_index],
                    flags: Vec::new(),
                });
            }
            RowRole::Total => {
                let metrics = row_metrics(row, section, &section.total_bounds);
                let key = total_group_key(&features.label, section, current_vendor.as_deref());
                let total = TotalRow {
                    group_key: key,
                    metrics,
                };
                // The vendor survives the total: detail rows may resume
                // under the same vendor without a fresh label line.
                close_group(
                    &mut groups,
                    &mut open_records,
                    current_vendor.clone(),
                    Some(total),
                );
                current_class = None;
            }
        }
    }

    // Trailing group without a printed total: kept, left unvalidated.
    close_group(&mut groups, &mut open_records, current_vendor.take(), None);

    Reconstruction {
        records,
        groups,
        dropped,
    }
}

/// Group key for a total line: the label text after the marker token,
/// falling back to the open vendor for bare "TOTAL" lines.
fn total_group_key(label: &str, section: &SectionConfig, vendor: Option<&str>) -> String {
    let rest = label
        .strip_prefix(section.total_marker.as_str())
        .unwrap_or("")
        .trim();
    if !rest.is_empty() {
        rest.to_string()
    } else {
        vendor.unwrap_or(label).to_string()
    }
}

fn close_group(
    groups: &mut Vec<Group>,
    open_records: &mut Vec<usize>,
    vendor: Option<String>,
    total: Option<TotalRow>,
) {
    match total {
        Some(total) => {
            // A printed total always forms a group, even an empty one:
            // zero accumulated records under a total is a parsing gap
            // the validator must surface, not hide.
            groups.push(Group {
                key: total.group_key.clone(),
                records: std::mem::take(open_records),
                total: Some(total),
            });
        }
        None => {
            if !open_records.is_empty() {
                groups.push(Group {
                    key: vendor.unwrap_or_default(),
                    records: std::mem::take(open_records),
                    total: None,
                });
            }
        }
    }
}
