//! Per-section layout configuration.
//!
//! Each report section (vendor summary, brand summary, ...) prints its
//! table at different horizontal positions, and within one section the
//! printed TOTAL lines sit left-shifted relative to detail lines. A
//! [`SectionConfig`] therefore carries two boundary tables: one for
//! detail rows and one for total rows.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::boundary::{ColumnBound, ColumnBoundaryTable};
use crate::error::{ConfigError, Result};
use crate::vocab::Vocabulary;

/// Layout and policy for one report section.
#[derive(Debug, Clone, Deserialize)]
pub struct SectionConfig {
    /// Range holding the row label (vendor or brand text).
    pub label_bound: ColumnBound,
    /// Range holding the spirit class text, when the section prints one.
    #[serde(default)]
    pub class_bound: Option<ColumnBound>,
    /// Metric column ranges for detail (brand) rows.
    pub detail_bounds: ColumnBoundaryTable,
    /// Metric column ranges for printed TOTAL rows.
    pub total_bounds: ColumnBoundaryTable,
    /// Metric columns to extract and reconcile, in output order.
    pub metric_columns: Vec<String>,
    /// Metric columns whose domain is non-negative (case volumes).
    #[serde(default)]
    pub non_negative_columns: Vec<String>,
    /// Token opening a printed aggregate line.
    #[serde(default = "default_total_marker")]
    pub total_marker: String,
    /// Relative-error tolerance for reconciliation. Policy, not physics:
    /// tuned against one report vendor's OCR failure modes.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Stray tokens that OCR merges onto the end of labels from
    /// neighbouring aggregate rows (e.g. "TOTAL VENDOR").
    #[serde(default)]
    pub stray_suffixes: Vec<String>,
}

fn default_total_marker() -> String {
    "TOTAL".to_string()
}

fn default_tolerance() -> f64 {
    0.01
}

impl SectionConfig {
    /// Validates both boundary tables and the metric column list.
    pub fn validate(&self, section: &str) -> Result<()> {
        if self.label_bound.x_min >= self.label_bound.x_max {
            return Err(ConfigError::EmptyRange {
                section: section.to_string(),
                column: self.label_bound.column.clone(),
                x_min: self.label_bound.x_min,
                x_max: self.label_bound.x_max,
            });
        }
        self.detail_bounds.validate(section)?;
        self.total_bounds.validate(section)?;

        if self.metric_columns.is_empty() {
            return Err(ConfigError::Validation(format!(
                "section '{section}': no metric columns configured"
            )));
        }
        for column in &self.metric_columns {
            if self.detail_bounds.bound(column).is_none() {
                return Err(ConfigError::UnknownMetricColumn {
                    section: section.to_string(),
                    column: column.clone(),
                });
            }
        }
        if self.total_marker.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "section '{section}': empty total marker"
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "section '{section}': tolerance must be a non-negative number"
            )));
        }
        Ok(())
    }
}

/// Full engine configuration: one entry per report section plus the
/// shared class vocabulary. Process-wide, read-only, safe to share
/// across concurrently processed documents.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub sections: BTreeMap<String, SectionConfig>,
    #[serde(default)]
    pub vocabulary: Vocabulary,
}

impl EngineConfig {
    /// Parses and validates a TOML configuration document.
    pub fn from_toml(input: &str) -> Result<Self> {
        let config: EngineConfig =
            toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sections.is_empty() {
            return Err(ConfigError::Validation(
                "at least one section is required".into(),
            ));
        }
        for (name, section) in &self.sections {
            section.validate(name)?;
        }
        Ok(())
    }

    pub fn section(&self, name: &str) -> Option<&SectionConfig> {
        self.sections.get(name)
    }
}
