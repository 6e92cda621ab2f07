//! Configuration error types.

use thiserror::Error;

/// Result type for configuration loading.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors raised while loading or validating configuration.
///
/// All of these are fatal: a malformed boundary table must stop the run
/// before any document is processed rather than silently degrade
/// classification.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    Parse(String),

    /// A boundary entry with `x_min >= x_max`.
    #[error("section '{section}': column '{column}' has empty range [{x_min}, {x_max})")]
    EmptyRange {
        section: String,
        column: String,
        x_min: f64,
        x_max: f64,
    },

    /// Boundary entries out of order or overlapping within one table.
    #[error("section '{section}': columns '{left}' and '{right}' overlap or are out of order")]
    OverlappingRanges {
        section: String,
        left: String,
        right: String,
    },

    /// Duplicate column name within one boundary table.
    #[error("section '{section}': duplicate column '{column}'")]
    DuplicateColumn { section: String, column: String },

    /// A metric column listed for a section has no boundary entry.
    #[error("section '{section}': metric column '{column}' has no boundary entry")]
    UnknownMetricColumn { section: String, column: String },

    /// Structural validation failure not tied to one table.
    #[error("config validation error: {0}")]
    Validation(String),
}
