//! # casewise-model
//!
//! Core data model for the casewise reconstruction engine.
//!
//! This crate provides:
//! - Positioned text cells and assembled rows
//! - Reconstructed hierarchy records and their anomaly flags
//! - Printed total rows and reconciliation results
//! - Numeric parsing for OCR metric cells

/// Positioned cells and row assembly.
pub mod cell;
/// Metric cell parsing.
pub mod numeric;
/// Reconstructed records, totals, and reconciliation output.
pub mod record;

pub use cell::{rows_from_cells, Cell, Row};
pub use numeric::parse_metric;
pub use record::{
    HierarchyRecord, Metrics, ReconStatus, ReconciliationResult, RecordFlag, TotalRow,
};
