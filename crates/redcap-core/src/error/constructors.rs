//! Constructor methods for RedcapError

use super::types::RedcapError;
use std::path::{Path, PathBuf};

impl RedcapError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a validation error for a named parameter
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a dataset-not-found error
    pub fn dataset_not_found(path: impl Into<PathBuf>) -> Self {
        Self::DatasetNotFound { path: path.into() }
    }

    /// Create an outside-of-dataset error
    pub fn outside_dataset(path: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self::OutsideDataset {
            path: path.into(),
            root: root.into(),
        }
    }

    /// Create a dataset operation error
    pub fn dataset(message: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
            command: None,
        }
    }

    /// Create a dataset operation error naming the failed command
    pub fn dataset_command(message: impl Into<String>, command: impl Into<String>) -> Self {
        Self::Dataset {
            message: message.into(),
            command: Some(command.into()),
        }
    }

    /// Create a credential error
    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
            name: None,
        }
    }

    /// Create a credential error for a named credential
    pub fn credential_named(message: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
            name: Some(name.into()),
        }
    }

    /// Create a REDCap API error
    pub fn api(message: impl Into<String>, status_code: Option<u16>) -> Self {
        Self::Api {
            message: message.into(),
            status_code,
        }
    }

    /// Create an HTTP error
    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
            url: None,
            status_code: None,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            path: None,
        }
    }

    /// Create an IO error for a specific path
    pub fn io_at(message: impl Into<String>, path: &Path) -> Self {
        Self::Io {
            message: message.into(),
            path: Some(path.to_path_buf()),
        }
    }

    /// Create a JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// Whether this error was caused by the path lying outside the dataset
    pub fn is_outside_dataset(&self) -> bool {
        matches!(self, Self::OutsideDataset { .. })
    }
}
