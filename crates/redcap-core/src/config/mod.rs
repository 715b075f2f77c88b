//! Configuration for redcap-export
//!
//! Configuration is assembled from (in order, later wins):
//! 1. built-in defaults
//! 2. a TOML or JSON file (`--config`, or `<config dir>/redcap-export/config.toml`)
//! 3. `REDCAP_*` environment variables

mod env_loader;
mod file_loader;
mod loader;
mod logging_config;
mod model;

pub use env_loader::apply_env_overrides;
pub use file_loader::load_from_file;
pub use loader::{ConfigLoader, ConfigSource, default_config_path, load_config};
pub use logging_config::{LogFormat, LoggingConfig};
pub use model::{HttpConfig, RedcapConfig};

/// Directory name used below the platform config directory
pub const APP_DIR_NAME: &str = "redcap-export";
