//! Error types for the plotting pipelines.

use thiserror::Error;

/// Fatal pipeline errors.
#[derive(Error, Debug)]
pub enum VizError {
    /// Error from the core crate (input resolution, configuration, validation).
    #[error(transparent)]
    Core(#[from] hc_core::Error),

    /// Error reading a ROOT file.
    #[error("ROOT file error: {0}")]
    Root(#[from] hc_root::RootError),

    /// I/O error on a container or output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A plot container failed validation.
    #[error("invalid plot container {path}: {reason}")]
    Container {
        /// Container path.
        path: String,
        /// What was wrong.
        reason: String,
    },

    /// A styling step failed where styling is not allowed to fail.
    #[error(transparent)]
    Style(#[from] StyleError),

    /// The page sink rejected a page.
    #[error("page output error: {0}")]
    Page(String),
}

/// A recoverable styling failure on one histogram primitive.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// The histogram has no bins in its displayed range.
    #[error("'{name}': no bins to compute a display range from")]
    NoBins {
        /// Primitive name.
        name: String,
    },

    /// A bin content or edge is NaN or infinite.
    #[error("'{name}': non-finite {what}")]
    NonFinite {
        /// Primitive name.
        name: String,
        /// `"bin content"` or `"bin edge"`.
        what: &'static str,
    },

    /// A computed display range is empty or inverted.
    #[error("'{name}': invalid {axis} range [{min}, {max}]")]
    InvalidRange {
        /// Primitive name.
        name: String,
        /// `"x"` or `"y"`.
        axis: &'static str,
        /// Lower limit.
        min: f64,
        /// Upper limit.
        max: f64,
    },
}

/// Result alias for the plotting pipelines.
pub type Result<T> = std::result::Result<T, VizError>;
