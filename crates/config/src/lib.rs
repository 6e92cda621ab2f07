//! # casewise-config
//!
//! Static, versioned configuration for the reconstruction engine:
//! column boundary tables, per-section layouts, and the canonical class
//! vocabulary. Configuration is validated completely at load time; a
//! malformed boundary table is a fatal error, never a silent downgrade
//! of classification quality.

/// Column boundary tables and range validation.
pub mod boundary;
/// Error types for configuration loading.
pub mod error;
/// Per-section layout and policy, and the top-level config.
pub mod section;
/// Canonical vocabulary lookups.
pub mod vocab;

pub use boundary::{ColumnBound, ColumnBoundaryTable};
pub use error::ConfigError;
pub use section::{EngineConfig, SectionConfig};
pub use vocab::Vocabulary;
