//! Configuration loading from multiple sources

use super::APP_DIR_NAME;
use super::env_loader::apply_env_overrides;
use super::file_loader::load_from_file;
use super::model::RedcapConfig;
use crate::error::RedcapResult;
use std::path::{Path, PathBuf};

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a file
    File(PathBuf),
    /// Overrides from `REDCAP_*` environment variables
    Environment,
    /// Built-in defaults
    Default,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add default configuration source
    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    /// Load configuration from all sources, in the order they were added
    pub fn load(self) -> RedcapResult<RedcapConfig> {
        let mut config = RedcapConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading configuration from {}", path.display());
                    config.merge(load_from_file(path)?);
                }
                ConfigSource::Environment => apply_env_overrides(&mut config)?,
                ConfigSource::Default => config.merge(RedcapConfig::default()),
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Platform default location of the configuration file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join("config.toml"))
}

/// Load configuration the way the command line tool does: defaults, then the
/// given (or default) file, then environment overrides.
pub fn load_config(path: Option<&Path>) -> RedcapResult<RedcapConfig> {
    let mut loader = ConfigLoader::new().with_defaults();
    match path {
        Some(path) => loader = loader.with_file(path),
        None => {
            if let Some(path) = default_config_path() {
                loader = loader.with_file(path);
            }
        }
    }
    loader.with_env().load()
}
