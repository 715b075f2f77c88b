//! Request and response types for the REDCap API

use serde::{Deserialize, Serialize};

/// Export of records for a set of forms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsRequest {
    pub forms: Vec<String>,
    pub survey_fields: bool,
}

/// Export of the whole project as CDISC ODM XML
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectXmlRequest {
    pub metadata_only: bool,
    pub survey_fields: bool,
    pub files: bool,
    pub dags: bool,
}

impl Default for ProjectXmlRequest {
    fn default() -> Self {
        Self {
            metadata_only: false,
            survey_fields: true,
            files: false,
            dags: false,
        }
    }
}

/// A data collection instrument (form) of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub instrument_name: String,
    pub instrument_label: String,
}
