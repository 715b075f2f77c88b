//! Environment variable-based configuration overrides

use super::model::RedcapConfig;
use crate::error::{RedcapError, RedcapResult};
use std::env;
use std::path::PathBuf;

pub const ENV_CREDENTIALS_FILE: &str = "REDCAP_CREDENTIALS_FILE";
pub const ENV_HTTP_TIMEOUT: &str = "REDCAP_HTTP_TIMEOUT";
pub const ENV_VERIFY_SSL: &str = "REDCAP_VERIFY_SSL";
pub const ENV_LOG_LEVEL: &str = "REDCAP_LOG_LEVEL";

/// Apply `REDCAP_*` environment variables on top of a configuration
pub fn apply_env_overrides(config: &mut RedcapConfig) -> RedcapResult<()> {
    if let Ok(path) = env::var(ENV_CREDENTIALS_FILE) {
        if !path.is_empty() {
            config.credentials_file = Some(PathBuf::from(path));
        }
    }

    if let Ok(timeout) = env::var(ENV_HTTP_TIMEOUT) {
        config.http.timeout_secs = timeout.parse().map_err(|_| {
            RedcapError::config(format!("Invalid {} value: {}", ENV_HTTP_TIMEOUT, timeout))
        })?;
    }

    if let Ok(verify) = env::var(ENV_VERIFY_SSL) {
        config.http.verify_ssl = parse_bool(&verify).ok_or_else(|| {
            RedcapError::config(format!("Invalid {} value: {}", ENV_VERIFY_SSL, verify))
        })?;
    }

    if let Ok(level) = env::var(ENV_LOG_LEVEL) {
        config.logging.level = level;
    }

    Ok(())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
