//! Error types for tablestylelib

use polars::prelude::PolarsError;
use thiserror::Error;

/// Errors that can occur while configuring or rendering a styled table
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StylerError {
    /// A referenced column is not part of the table
    #[error("column not found: '{0}'")]
    ColumnNotFound(String),

    /// Labels, styles or columns don't line up with the table's columns
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Pagination window is out of range
    #[error("invalid page range: page index {page_index}, page size {page_size}")]
    InvalidRange { page_index: i64, page_size: i64 },

    /// Polars or a format rule rejected the pipeline while collecting
    #[error("evaluation failed: {0}")]
    EvaluationFailure(String),

    /// A color string could not be parsed
    #[error("invalid color: '{0}'")]
    InvalidColor(String),
}

// PolarsError is neither Clone nor PartialEq, so keep its message only.
impl From<PolarsError> for StylerError {
    fn from(err: PolarsError) -> Self {
        StylerError::EvaluationFailure(err.to_string())
    }
}
