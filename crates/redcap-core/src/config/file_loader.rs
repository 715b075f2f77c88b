//! File-based configuration loading

use super::model::RedcapConfig;
use crate::error::{RedcapError, RedcapResult};
use std::fs;
use std::path::Path;

/// Load configuration from a file
///
/// Supports TOML and JSON formats based on file extension (TOML unless the
/// extension is `.json`). Returns the default config if the file doesn't exist.
pub fn load_from_file(path: &Path) -> RedcapResult<RedcapConfig> {
    if !path.exists() {
        return Ok(RedcapConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        RedcapError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config: RedcapConfig = match path.extension().and_then(|s| s.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            RedcapError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
        _ => toml::from_str(&content).map_err(|e| {
            RedcapError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}
