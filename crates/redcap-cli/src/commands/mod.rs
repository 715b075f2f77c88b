//! Command implementations

pub mod export;
pub mod query;

use crate::prompt::DialoguerPrompt;
use redcap_core::config::RedcapConfig;
use redcap_core::credential::{CredentialResolver, FileCredentialStore};
use std::sync::Arc;
use tracing::debug;

/// Resolver over the configured credential file, prompting on the terminal
pub(crate) fn credential_resolver(config: &RedcapConfig) -> CredentialResolver {
    let path = config.credentials_path();
    debug!("Using credential store {}", path.display());
    CredentialResolver::new(
        Arc::new(FileCredentialStore::new(path)),
        Arc::new(DialoguerPrompt),
    )
}
