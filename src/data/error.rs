use std::path::PathBuf;

use thiserror::Error;

/// Reasons the base table could not be produced. Every variant is fatal to
/// the dashboard; there is no degraded mode and no retry.
#[derive(Debug, Error)]
pub enum DataUnavailable {
    #[error("HTTP request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: invalid {column} value '{value}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: required {column} value is empty")]
    MissingValue { row: usize, column: &'static str },

    #[error("dataset contains no rows")]
    Empty,
}
