//! Error types for table construction

use thiserror::Error;

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;

/// Table construction errors.
///
/// Runtime failures (a failed fetch, a malformed query string) never raise:
/// they surface through the snapshot or degrade to defaults.
#[derive(Error, Debug)]
pub enum TableError {
    /// A searchable or filterable column is not part of the column set
    #[error("Unknown column '{column}' in {position}")]
    UnknownColumn { column: String, position: String },

    /// The column set is empty
    #[error("A table needs at least one column")]
    NoColumns,
}

impl TableError {
    pub fn unknown_column(column: impl Into<String>, position: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
            position: position.into(),
        }
    }
}
