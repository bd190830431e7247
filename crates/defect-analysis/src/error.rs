//! Error types for the defect report pipeline.
//!
//! Every failure in the pipeline is fatal: the binary prints the diagnostic
//! and exits. Errors still carry a stable code so the JSON output can report
//! them in a machine-readable form.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for the report pipeline.
#[derive(Error, Debug)]
pub enum ReportError {
    /// An expected column is missing from the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A column exists but has a type the step cannot work with.
    #[error("Column '{column}' has type {actual}, expected {expected}")]
    InvalidColumnType {
        column: String,
        expected: String,
        actual: String,
    },

    /// A computation needs at least one row.
    #[error("Dataset is empty: {0}")]
    EmptyDataset(String),

    /// The requested machine does not appear in the data.
    #[error("Machine '{0}' not found in dataset")]
    MachineNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Chart rendering failed.
    #[error("Failed to render chart: {0}")]
    Chart(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with the pipeline stage it happened in.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ReportError>,
    },
}

impl ReportError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ReportError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code, used in JSON output.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidColumnType { .. } => "INVALID_COLUMN_TYPE",
            Self::EmptyDataset(_) => "EMPTY_DATASET",
            Self::MachineNotFound(_) => "MACHINE_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Chart(_) => "CHART_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for ReportError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ReportError::Chart(err.to_string())
    }
}

impl From<crate::config::ConfigValidationError> for ReportError {
    fn from(err: crate::config::ConfigValidationError) -> Self {
        ReportError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as `{ "code": ..., "message": ... }`.
impl Serialize for ReportError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ReportError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| ReportError::Polars(e).with_context(context))
    }
}
