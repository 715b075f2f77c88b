//! Terminal result of a command

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Ok,
    Error,
    /// The operation could not be attempted at all
    Impossible,
}

impl ExportStatus {
    pub fn is_ok(self) -> bool {
        self == ExportStatus::Ok
    }
}

impl fmt::Display for ExportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStatus::Ok => write!(f, "ok"),
            ExportStatus::Error => write!(f, "error"),
            ExportStatus::Impossible => write!(f, "impossible"),
        }
    }
}

/// Outcome of one unit of work, rendered by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportResult {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    pub status: ExportStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured payload, e.g. the instrument list of a query
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl ExportResult {
    fn new(action: impl Into<String>, path: Option<PathBuf>, status: ExportStatus) -> Self {
        Self {
            action: action.into(),
            path,
            status,
            message: None,
            data: None,
        }
    }

    pub fn ok(action: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(action, Some(path.into()), ExportStatus::Ok)
    }

    pub fn error(
        action: impl Into<String>,
        path: impl Into<PathBuf>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(action, Some(path.into()), ExportStatus::Error).with_message(message)
    }

    pub fn impossible(action: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(action, None, ExportStatus::Impossible).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status.is_ok()
    }
}
