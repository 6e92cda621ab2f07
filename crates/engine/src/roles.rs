//! Row role classification.
//!
//! The role of a row cannot always be read off the row alone: vendor
//! names wrap across printed lines with no marker, and the only reliable
//! wrap signal is "text but no numbers, immediately after another
//! text-but-no-numbers row". Classification is therefore an explicit
//! transition function over `(previous role, current row features)`,
//! with no further history.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use casewise_config::SectionConfig;
use casewise_model::Row;

use crate::columns::{classify_cell, row_metrics};

lazy_static! {
    // Page furniture that repeats on every page of the report. Phrases
    // are multi-word on purpose: single words like "CLASS" or "MAY"
    // collide with real labels (VODKA-CLASSIC-DOM, EL MAYOR).
    static ref BOILERPLATE: Regex = Regex::new(
        r"(?i)(VENDOR SUMMARY|BRAND SUMMARY|CASE SALES|CONTROL STATES|CLASS & TYPE|VENDOR / BRAND|LAST 12 MONTHS|NABCA|COPYRIGHT)"
    ).unwrap();
    // Month headings are only furniture when followed by a year.
    static ref MONTH_HEADING: Regex = Regex::new(
        r"\b(JANUARY|FEBRUARY|MARCH|APRIL|MAY|JUNE|JULY|AUGUST|SEPTEMBER|OCTOBER|NOVEMBER|DECEMBER) 20\d\d\b"
    ).unwrap();
}

/// Role assigned to one assembled row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowRole {
    /// Repeated page furniture (titles, column headings). Dropped.
    Header,
    /// A vendor label line opening a new group.
    Vendor,
    /// A wrapped continuation of the previous vendor label.
    Continuation,
    /// A detail line carrying metrics.
    Brand,
    /// A printed aggregate line closing the group.
    Total,
    /// Nothing usable. Dropped and counted.
    Junk,
}

/// Per-row features feeding the transition function. Derived once per
/// row; classification itself never re-reads the cells.
#[derive(Debug, Clone)]
pub struct RowFeatures {
    /// Concatenated text of cells in the label range, left to right.
    pub label: String,
    /// Concatenated text of cells in the class range, if configured.
    pub class_text: String,
    /// Number of detail metric columns holding a parseable value.
    pub numeric_count: usize,
    /// Cells landing in no configured range. Counted, then dropped.
    pub unassigned_cells: usize,
    /// Whole-row text matched a boilerplate pattern.
    pub is_boilerplate: bool,
}

impl RowFeatures {
    /// Derives features for one row under a section layout.
    pub fn extract(row: &Row, section: &SectionConfig) -> Self {
        let mut label_parts: Vec<&str> = Vec::new();
        let mut class_parts: Vec<&str> = Vec::new();
        let mut unassigned_cells = 0;

        for cell in &row.cells {
            let mid = cell.midpoint();
            if section.label_bound.contains(mid) {
                label_parts.push(cell.text.trim());
            } else if section
                .class_bound
                .as_ref()
                .is_some_and(|b| b.contains(mid))
            {
                class_parts.push(cell.text.trim());
            } else if classify_cell(cell, &section.detail_bounds).is_none()
                && classify_cell(cell, &section.total_bounds).is_none()
            {
                unassigned_cells += 1;
            }
        }

        let metrics = row_metrics(row, section, &section.detail_bounds);
        let numeric_count = metrics.values().filter(|v| v.is_some()).count();

        let row_text: String = row
            .cells
            .iter()
            .map(|c| c.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let is_boilerplate =
            BOILERPLATE.is_match(&row_text) || MONTH_HEADING.is_match(&row_text);

        Self {
            label: label_parts.join(" ").trim().to_string(),
            class_text: class_parts.join(" ").trim().to_string(),
            numeric_count,
            unassigned_cells,
            is_boilerplate,
        }
    }
}

/// Whether a label opens a printed aggregate line for `section`.
/// Matches the whole first token ("TOTAL ACME" yes, "TOTALLY FINE GIN" no).
pub fn is_total_label(label: &str, section: &SectionConfig) -> bool {
    let marker = section.total_marker.as_str();
    label == marker
        || label
            .strip_prefix(marker)
            .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}

/// The transition function: `(previous role, features) -> role`.
///
/// Rules in priority order: boilerplate, total marker, label-with-
/// numbers, label-without-numbers (vendor, or continuation when the
/// previous row was already a bare vendor label), junk.
pub fn classify(prev: Option<RowRole>, features: &RowFeatures, section: &SectionConfig) -> RowRole {
    if features.is_boilerplate {
        return RowRole::Header;
    }
    if features.label.is_empty() {
        return RowRole::Junk;
    }
    if is_total_label(&features.label, section) {
        return RowRole::Total;
    }
    if features.numeric_count == 0 {
        return match prev {
            Some(RowRole::Vendor | RowRole::Continuation) => RowRole::Continuation,
            _ => RowRole::Vendor,
        };
    }
    RowRole::Brand
}
