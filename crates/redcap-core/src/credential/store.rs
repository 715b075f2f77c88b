//! Credential store contract

use super::model::Credential;
use crate::error::RedcapResult;
use std::cmp::Reverse;

/// Persistent, name-keyed credential storage
pub trait CredentialStore: Send + Sync {
    /// Credential stored under `name`
    fn get(&self, name: &str) -> RedcapResult<Option<Credential>>;

    /// Credentials whose realm matches, most recently used first
    fn query(&self, realm: &str) -> RedcapResult<Vec<(String, Credential)>>;

    /// Create or replace the credential stored under `name`
    fn set(&self, name: &str, credential: &Credential) -> RedcapResult<()>;

    /// Remove a credential; returns whether it existed
    fn remove(&self, name: &str) -> RedcapResult<bool>;
}

/// Filter `(name, credential)` pairs by realm and order them most recent
/// first. Never-used credentials come last, ties broken by name.
pub(crate) fn matching_realm<'a, I>(entries: I, realm: &str) -> Vec<(String, Credential)>
where
    I: IntoIterator<Item = (&'a String, &'a Credential)>,
{
    let mut matches: Vec<(String, Credential)> = entries
        .into_iter()
        .filter(|(_, cred)| cred.realm.as_deref() == Some(realm))
        .map(|(name, cred)| (name.clone(), cred.clone()))
        .collect();
    matches.sort_by(|(a_name, a), (b_name, b)| {
        (Reverse(a.last_used), a_name).cmp(&(Reverse(b.last_used), b_name))
    });
    matches
}
