//! Credential resolution and update
//!
//! [`CredentialResolver::obtain`] finds a token for a REDCap API URL, asking
//! the user when the store has nothing usable. [`CredentialResolver::update`]
//! records the token once an API call has accepted it.

use super::model::{
    Credential, CredentialField, ObtainedCredential, TOKEN_TYPE, default_credential_name,
};
use super::prompt::{CredentialPrompt, PromptRequest};
use super::store::CredentialStore;
use crate::error::{RedcapError, RedcapResult};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct CredentialResolver {
    store: Arc<dyn CredentialStore>,
    prompt: Arc<dyn CredentialPrompt>,
}

impl CredentialResolver {
    pub fn new(store: Arc<dyn CredentialStore>, prompt: Arc<dyn CredentialPrompt>) -> Self {
        Self { store, prompt }
    }

    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.store
    }

    /// Look up a stored credential, by name or else by realm
    fn lookup(&self, name: Option<&str>, realm: &str) -> Option<(String, Credential)> {
        let found = match name {
            Some(name) => self
                .store
                .get(name)
                .map(|cred| cred.map(|cred| (name.to_string(), cred))),
            None => self
                .store
                .query(realm)
                .map(|matches| matches.into_iter().next()),
        };
        match found {
            Ok(found) => found,
            Err(e) => {
                warn!("Could not read credential store, treating as empty: {}", e);
                None
            }
        }
    }

    /// Obtain a credential for `realm`.
    ///
    /// A stored credential carrying every required field is returned as is.
    /// Otherwise the user is prompted for what is missing; the result then
    /// carries the requested realm and the token type hint. Nothing is
    /// written to the store.
    pub fn obtain(
        &self,
        name: Option<&str>,
        realm: &str,
        required: &[CredentialField],
    ) -> RedcapResult<ObtainedCredential> {
        let found = self.lookup(name, realm);

        if let Some((found_name, credential)) = &found {
            if credential.missing(required).is_empty() {
                debug!("Using stored credential {}", found_name);
                return Ok(ObtainedCredential {
                    name: Some(found_name.clone()),
                    credential: credential.clone(),
                    prompted: false,
                });
            }
        }

        let mut credential = found.map(|(_, cred)| cred).unwrap_or_default();
        if !credential.has(CredentialField::Realm) {
            credential.realm = Some(realm.to_string());
        }
        if credential.kind.is_none() {
            credential.kind = Some(TOKEN_TYPE.to_string());
        }

        let mut missing = credential.missing(required);
        if !missing.contains(&CredentialField::Secret) && !credential.has(CredentialField::Secret) {
            missing.insert(0, CredentialField::Secret);
        }

        let mut prompted = false;
        if !missing.is_empty() {
            let request = PromptRequest::token(realm, name, missing);
            let answer = self.prompt.prompt(&request)?;
            prompted = true;
            if answer.has(CredentialField::Secret) {
                credential.secret = answer.secret;
            }
            if let Some(answered_realm) = answer.realm.filter(|r| !r.is_empty()) {
                credential.realm = Some(answered_realm);
            }
        }

        if !credential.has(CredentialField::Secret) {
            return Err(match name {
                Some(name) => RedcapError::credential_named("No token was provided", name),
                None => RedcapError::credential("No token was provided"),
            });
        }

        Ok(ObtainedCredential {
            name: name.map(str::to_string),
            credential,
            prompted,
        })
    }

    /// Persist or refresh a credential after it was used successfully.
    ///
    /// An existing record only gets its `last_used` stamp refreshed. Failures
    /// are logged and never returned.
    pub fn update(&self, obtained: &ObtainedCredential) {
        let name = obtained
            .name
            .clone()
            .unwrap_or_else(|| default_credential_name(obtained.credential.realm.as_deref()));

        if let Err(e) = self.persist(&name, &obtained.credential) {
            warn!("Could not store credential {}: {}", name, e);
        }
    }

    fn persist(&self, name: &str, used: &Credential) -> RedcapResult<()> {
        let now = Some(Utc::now());
        match self.store.get(name)? {
            Some(mut existing) => {
                if existing.secret.is_some() && existing.secret != used.secret {
                    warn!(
                        "Stored credential {} differs from the token just used; keeping the stored one",
                        name
                    );
                }
                existing.last_used = now;
                self.store.set(name, &existing)?;
                debug!("Refreshed credential {}", name);
            }
            None => {
                let mut created = used.clone();
                created.last_used = now;
                self.store.set(name, &created)?;
                info!("Stored new credential {}", name);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
