//! In-memory credential store, for tests and embedding

use super::file_store::validate_for_storage;
use super::model::Credential;
use super::store::{CredentialStore, matching_realm};
use crate::error::{RedcapError, RedcapResult};
use parking_lot::Mutex;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    credentials: Mutex<BTreeMap<String, Credential>>,
    fail_writes: bool,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a credential
    pub fn with_credential(self, name: impl Into<String>, credential: Credential) -> Self {
        self.credentials.lock().insert(name.into(), credential);
        self
    }

    /// Make every `set` fail, as if the backing storage were unreachable
    pub fn with_failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn len(&self) -> usize {
        self.credentials.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.lock().is_empty()
    }

    /// Names of all stored credentials
    pub fn names(&self) -> Vec<String> {
        self.credentials.lock().keys().cloned().collect()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, name: &str) -> RedcapResult<Option<Credential>> {
        Ok(self.credentials.lock().get(name).cloned())
    }

    fn query(&self, realm: &str) -> RedcapResult<Vec<(String, Credential)>> {
        Ok(matching_realm(self.credentials.lock().iter(), realm))
    }

    fn set(&self, name: &str, credential: &Credential) -> RedcapResult<()> {
        if self.fail_writes {
            return Err(RedcapError::credential_named("store unreachable", name));
        }
        validate_for_storage(name, credential)?;
        self.credentials
            .lock()
            .insert(name.to_string(), credential.clone());
        Ok(())
    }

    fn remove(&self, name: &str) -> RedcapResult<bool> {
        Ok(self.credentials.lock().remove(name).is_some())
    }
}
