//! Positioned text cells and row assembly.
//!
//! A [`Cell`] is one unit of text produced by the upstream OCR/table
//! extraction collaborator, with horizontal bounds normalized to [0,1] of
//! page width. A [`Row`] is the ordered set of cells sharing a
//! `(page, row_index)` pair; rows only live for one classification pass.

use serde::{Deserialize, Serialize};

/// A single positioned unit of extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Extracted text, as produced upstream (not trimmed).
    pub text: String,
    /// 1-based page number within the document.
    pub page: u32,
    /// Row index within the page, assigned upstream by line grouping.
    pub row_index: u32,
    /// Left edge, normalized to [0,1] of page width.
    pub x_min: f64,
    /// Right edge, normalized to [0,1] of page width.
    pub x_max: f64,
}

impl Cell {
    /// Horizontal midpoint of the cell.
    pub fn midpoint(&self) -> f64 {
        (self.x_min + self.x_max) / 2.0
    }

    /// Horizontal span of the cell. Zero-width cells are legal input.
    pub fn width(&self) -> f64 {
        (self.x_max - self.x_min).max(0.0)
    }
}

/// Cells sharing a `(page, row_index)`, sorted left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub page: u32,
    pub row_index: u32,
    pub cells: Vec<Cell>,
}

/// Assembles cells into rows in document order (page, then row index).
///
/// Cells within a row are ordered left to right. The input does not need
/// to be sorted; hierarchy reconstruction depends on the output order.
pub fn rows_from_cells(cells: Vec<Cell>) -> Vec<Row> {
    let mut sorted = cells;
    sorted.sort_by(|a, b| {
        (a.page, a.row_index)
            .cmp(&(b.page, b.row_index))
            .then(a.x_min.partial_cmp(&b.x_min).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut rows: Vec<Row> = Vec::new();
    for cell in sorted {
        match rows.last_mut() {
            Some(row) if row.page == cell.page && row.row_index == cell.row_index => {
                row.cells.push(cell);
            }
            _ => rows.push(Row {
                page: cell.page,
                row_index: cell.row_index,
                cells: vec![cell],
            }),
        }
    }
    rows
}
