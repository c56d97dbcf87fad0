//! Error kinds raised by payroll operations.

use polars::prelude::PolarsError;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, PayscopeError>;

#[derive(Debug, thiserror::Error)]
pub enum PayscopeError {
    /// An expected CSV file does not exist.
    #[error("{} not found", .0.display())]
    MissingFile(PathBuf),

    /// A loaded table lacks a column the operation needs.
    #[error("Column {column} not found in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },

    /// A user-supplied value failed validation.
    #[error("{0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PayscopeError {
    pub fn missing_column(column: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingColumn {
            column: column.into(),
            path: path.into(),
        }
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Precondition failures are reported by name; everything else is an
    /// unanticipated failure caught at the operation boundary.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::MissingFile(_) | Self::MissingColumn { .. } | Self::InvalidParameter(_)
        )
    }
}
