//! Error types for the report pipeline.
//!
//! The core distinguishes two failure classes: the source table does not
//! have the shape a strategy needs (`SchemaMismatch`), and the builder was
//! asked to run before it was fully configured (`ConfigurationError`).
//! Everything else (I/O, SQL) stays at the application layer as `anyhow`
//! errors.

use thiserror::Error;

/// Result type for report generation.
pub type ReportResult<T> = Result<T, ReportError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// A column required by a strategy (or named as a sort key) is absent.
    #[error("required column '{column}' is missing from the table")]
    SchemaMismatch { column: String },

    /// `build()` or `register()` was called before the builder had what it
    /// needs (a source table, at least one strategy).
    #[error("report builder is not configured: {0}")]
    ConfigurationError(String),
}

impl ReportError {
    pub fn missing_column(column: impl Into<String>) -> Self {
        ReportError::SchemaMismatch {
            column: column.into(),
        }
    }
}
