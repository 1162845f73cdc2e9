//! Error types shared across trfscope crates.

use std::path::PathBuf;

/// Top-level error type for trfscope operations.
///
/// Only conditions that abort a single-file run live here. Recoverable
/// decode conditions (ambiguous format, undetected layout, truncated or
/// out-of-range records) are modeled as values on the analysis types,
/// never as errors.
#[derive(Debug, thiserror::Error)]
pub enum TrfError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Format error: {message}")]
    Format { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using TrfError.
pub type TrfResult<T> = Result<T, TrfError>;

impl TrfError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }
}
