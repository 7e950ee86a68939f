//! Error types for loading a transaction table.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading a dataset. All of them are fatal to
/// the session: the dashboard shows the message and renders no data.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse delimited file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to parse JSON file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read parquet file {path}: {source}")]
    Parquet {
        path: PathBuf,
        #[source]
        source: parquet::errors::ParquetError,
    },

    #[error("failed to decode record batch in {path}: {source}")]
    Arrow {
        path: PathBuf,
        #[source]
        source: arrow::error::ArrowError,
    },

    /// The file parsed, but does not describe a table.
    #[error("{path} is not a table: {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("unsupported file extension .{extension} for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
