//! Stable error codes

use super::types::RedcapError;

/// Programmatic identification of errors.
pub trait ErrorCode {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &'static str;
}

impl ErrorCode for RedcapError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config { .. } => "REDCAP_CONFIG",
            Self::Validation { .. } => "REDCAP_VALIDATION",
            Self::DatasetNotFound { .. } => "REDCAP_DATASET_NOT_FOUND",
            Self::OutsideDataset { .. } => "REDCAP_OUTSIDE_DATASET",
            Self::Dataset { .. } => "REDCAP_DATASET",
            Self::Credential { .. } => "REDCAP_CREDENTIAL",
            Self::Api { .. } => "REDCAP_API",
            Self::Http { .. } => "REDCAP_HTTP",
            Self::Io { .. } => "REDCAP_IO",
            Self::Json { .. } => "REDCAP_JSON",
            Self::Cancelled => "REDCAP_CANCELLED",
        }
    }
}
