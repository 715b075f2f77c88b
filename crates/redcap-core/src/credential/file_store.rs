//! JSON file backed credential store

use super::model::{Credential, CredentialField};
use super::store::{CredentialStore, matching_realm};
use crate::error::{RedcapError, RedcapResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk layout of the credentials file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredentialsFile {
    /// Credentials indexed by name
    #[serde(default)]
    pub credentials: BTreeMap<String, Credential>,
}

impl CredentialsFile {
    /// Load credentials from a file; a missing file is an empty store
    pub fn load(path: &Path) -> RedcapResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            RedcapError::credential(format!(
                "Failed to read credentials file {}: {}",
                path.display(),
                e
            ))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            RedcapError::credential(format!(
                "Failed to parse credentials file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Save credentials to a file.
    ///
    /// The content is written to a sibling temporary file which is then
    /// renamed over the target. On Unix the file is only readable by its
    /// owner.
    pub fn save(&self, path: &Path) -> RedcapResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RedcapError::io_at(e.to_string(), parent))?;
        }
        let content = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options
            .open(&tmp)
            .map_err(|e| RedcapError::io_at(e.to_string(), &tmp))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.sync_all())
            .map_err(|e| RedcapError::io_at(e.to_string(), &tmp))?;
        drop(file);

        fs::rename(&tmp, path).map_err(|e| RedcapError::io_at(e.to_string(), path))
    }
}

/// Credential store persisted as a JSON file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Reject credentials that could never be used
pub(crate) fn validate_for_storage(name: &str, credential: &Credential) -> RedcapResult<()> {
    if name.trim().is_empty() {
        return Err(RedcapError::credential("Credential name must not be empty"));
    }
    if !credential.has(CredentialField::Secret) {
        return Err(RedcapError::credential_named(
            "Refusing to store a credential without a secret",
            name,
        ));
    }
    Ok(())
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, name: &str) -> RedcapResult<Option<Credential>> {
        Ok(CredentialsFile::load(&self.path)?.credentials.remove(name))
    }

    fn query(&self, realm: &str) -> RedcapResult<Vec<(String, Credential)>> {
        let file = CredentialsFile::load(&self.path)?;
        Ok(matching_realm(&file.credentials, realm))
    }

    fn set(&self, name: &str, credential: &Credential) -> RedcapResult<()> {
        validate_for_storage(name, credential)?;
        let mut file = CredentialsFile::load(&self.path)?;
        file.credentials.insert(name.to_string(), credential.clone());
        file.save(&self.path)?;
        debug!("Wrote credential {} to {}", name, self.path.display());
        Ok(())
    }

    fn remove(&self, name: &str) -> RedcapResult<bool> {
        let mut file = CredentialsFile::load(&self.path)?;
        let existed = file.credentials.remove(name).is_some();
        if existed {
            file.save(&self.path)?;
        }
        Ok(existed)
    }
}
