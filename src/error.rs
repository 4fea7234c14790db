use std::path::PathBuf;
use thiserror::Error;

/// The main error type for yolocheck operations.
#[derive(Debug, Error)]
pub enum YolocheckError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset layout at {path}: {message}")]
    LayoutInvalid { path: PathBuf, message: String },

    #[error("Failed to parse class map {path}: {source}")]
    ClassMapParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid parameters: {message}")]
    InvalidParams { message: String },

    #[error("Failed to serialize report: {0}")]
    ReportSerialize(#[from] serde_json::Error),

    #[error("Check failed with {error_count} error(s) and {warning_count} warning(s)")]
    CheckFailed {
        error_count: usize,
        warning_count: usize,
    },

    #[error("Unsupported output format: {0}")]
    UnsupportedOutput(String),
}
