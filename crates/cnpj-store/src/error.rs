use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("spreadsheet error at {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },

    #[error("unsupported source file (expected .xlsx): {0}")]
    UnsupportedFormat(PathBuf),

    #[error("source file has no non-empty cells: {0}")]
    EmptySource(PathBuf),

    #[error("row {row} is missing columns: {}", .missing.join(", "))]
    MissingColumns {
        row: usize,
        missing: Vec<&'static str>,
    },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn spreadsheet(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        Self::Spreadsheet {
            path: path.into(),
            message: err.to_string(),
        }
    }
}
