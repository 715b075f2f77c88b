//! From trait implementations for RedcapError conversions

use super::types::RedcapError;

impl From<std::io::Error> for RedcapError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for RedcapError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<toml::de::Error> for RedcapError {
    fn from(error: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML: {}", error))
    }
}

impl From<reqwest::Error> for RedcapError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}
