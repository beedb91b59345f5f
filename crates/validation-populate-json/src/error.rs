//! Error types for the JSON populator.

use thiserror::Error;

/// Errors that can occur while generating a validation document.
///
/// Every variant is fatal for the run. An output file that was already
/// created is left as written, possibly without its closing bracket.
#[derive(Error, Debug)]
pub enum JsonPopulatorError {
    /// IO error while creating or writing the output.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A validation event could not be serialized.
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Rejected configuration value.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
