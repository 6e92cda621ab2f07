//! Tabular reconstruction and reconciliation engine.
//!
//! Takes positioned OCR cells from a fixed-layout tabular report,
//! classifies them into columns and row roles, rebuilds the
//! vendor/brand/class hierarchy, repairs the recurring OCR corruptions,
//! and validates running sums against the report's own printed TOTAL
//! lines.

pub mod columns;
pub mod pipeline;
pub mod reconcile;
pub mod reconstruct;
pub mod repair;
pub mod roles;

pub use columns::{classify_cell, row_metrics};
pub use pipeline::{process_document, DocumentReport};
pub use reconcile::{reconcile, AccuracyReport, ColumnAccuracy};
pub use reconstruct::{reconstruct, DroppedRows, Group, Reconstruction};
pub use repair::{collapse_duplicated_label, repair_record, strip_stray_suffix};
pub use roles::{classify, RowFeatures, RowRole};
