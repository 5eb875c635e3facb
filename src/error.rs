//! Error types for the classification and aggregation core.

use thiserror::Error;

/// Recoverable failures reported by core operations.
///
/// None of these are fatal: the session keeps its previous dataset, window and
/// results whenever an operation returns one of them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExploreError {
    #[error("Load a CSV first.")]
    NoDataLoaded,

    #[error("Unknown dataset '{0}'")]
    UnknownDatasetKey(String),

    #[error("Window size must be a positive integer, got '{0}'")]
    InvalidWindowSize(String),

    #[error("No rows found for {column} = '{value}'")]
    NoMatchingRows { column: String, value: String },

    #[error("Select at least one group to display.")]
    NoGroupsSelected,

    #[error("No groups available in '{0}'")]
    NoGroupsDiscovered(String),

    #[error("Missing column '{0}'")]
    MissingColumn(String),

    #[error("Column '{column}' has {actual} rows, expected {expected}")]
    RowCountMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, ExploreError>;
