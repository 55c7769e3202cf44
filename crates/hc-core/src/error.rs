//! Error types for hepcmp

use std::path::PathBuf;

use thiserror::Error;

/// hepcmp core error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Input table missing under both the bare and the extension-qualified name
    #[error("File not found: {} or {}", requested.display(), tried.display())]
    InputNotFound {
        /// Path as requested by the caller.
        requested: PathBuf,
        /// Extension-qualified fallback that was also tried.
        tried: PathBuf,
    },

    /// Table scanned completely without a single valid row
    #[error("No valid numeric data found in {}", .0.display())]
    EmptyResult(PathBuf),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
