//! Core error type

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for redcap-export operations
pub type RedcapResult<T> = Result<T, RedcapError>;

/// Main error type
#[derive(Error, Debug, Clone)]
pub enum RedcapError {
    /// Configuration file or environment problems
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Parameter validation failed before any network or file activity
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// No dataset could be found at (or above) the given location
    #[error("No dataset found at {}", path.display())]
    DatasetNotFound { path: PathBuf },

    /// Path lies outside the reference dataset
    #[error("Path {} is outside the dataset at {}", path.display(), root.display())]
    OutsideDataset { path: PathBuf, root: PathBuf },

    /// A git / git-annex command failed
    #[error("Dataset operation failed: {message}")]
    Dataset {
        message: String,
        command: Option<String>,
    },

    /// Credential store or prompt failure
    #[error("Credential error: {message}")]
    Credential {
        message: String,
        name: Option<String>,
    },

    /// REDCap API reported an error
    #[error("REDCap API error: {message}")]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    /// Transport level HTTP failure
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json { message: String },

    /// User cancelled an interactive prompt
    #[error("Cancelled by user")]
    Cancelled,
}
