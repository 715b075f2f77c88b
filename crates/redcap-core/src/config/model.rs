//! Configuration data model

use super::APP_DIR_NAME;
use super::logging_config::LoggingConfig;
use crate::error::{RedcapError, RedcapResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default timeout for REDCap API requests. Project XML exports can be slow.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Verify TLS certificates
    pub verify_ssl: bool,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            verify_ssl: true,
            user_agent: format!("redcap-export/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RedcapConfig {
    /// Location of the credential store; platform default when unset
    pub credentials_file: Option<PathBuf>,
    /// HTTP client settings
    pub http: HttpConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl RedcapConfig {
    /// Path of the credential store file
    pub fn credentials_path(&self) -> PathBuf {
        self.credentials_file.clone().unwrap_or_else(|| {
            dirs::config_dir()
                .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".config"))
                .join(APP_DIR_NAME)
                .join("credentials.json")
        })
    }

    /// Merge another configuration on top of this one.
    ///
    /// Only values that differ from the defaults override.
    pub fn merge(&mut self, other: RedcapConfig) {
        if other.credentials_file.is_some() {
            self.credentials_file = other.credentials_file;
        }

        let default_http = HttpConfig::default();
        if other.http.timeout_secs != default_http.timeout_secs {
            self.http.timeout_secs = other.http.timeout_secs;
        }
        if other.http.verify_ssl != default_http.verify_ssl {
            self.http.verify_ssl = other.http.verify_ssl;
        }
        if other.http.user_agent != default_http.user_agent {
            self.http.user_agent = other.http.user_agent;
        }

        self.logging.merge(other.logging);
    }

    /// Validate the configuration
    pub fn validate(&self) -> RedcapResult<()> {
        if self.http.timeout_secs == 0 {
            return Err(RedcapError::config("http.timeout_secs must be greater than 0"));
        }
        if self.http.user_agent.trim().is_empty() {
            return Err(RedcapError::config("http.user_agent must not be empty"));
        }
        self.logging.validate()
    }
}
