//! Interactive credential entry

use super::model::{Credential, CredentialField, TOKEN_TYPE};
use crate::error::{RedcapError, RedcapResult};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Message shown when a REDCap token has to be entered
pub const TOKEN_PROMPT: &str = "A token is required to access the REDCap project API";

/// What the user is being asked for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptRequest {
    pub message: String,
    /// Name the credential will be stored under, when the caller gave one
    pub name: Option<String>,
    pub realm: String,
    pub type_hint: String,
    pub missing: Vec<CredentialField>,
}

impl PromptRequest {
    /// A token request for a realm
    pub fn token(realm: impl Into<String>, name: Option<&str>, missing: Vec<CredentialField>) -> Self {
        Self {
            message: TOKEN_PROMPT.to_string(),
            name: name.map(str::to_string),
            realm: realm.into(),
            type_hint: TOKEN_TYPE.to_string(),
            missing,
        }
    }
}

/// Capability to ask the user for credential fields.
///
/// Implementations return a credential carrying at least the requested
/// fields, or an error when the user cannot or will not answer.
pub trait CredentialPrompt: Send + Sync {
    fn prompt(&self, request: &PromptRequest) -> RedcapResult<Credential>;
}

/// Prompt that answers from a fixed script of secrets
#[derive(Debug, Default)]
pub struct StaticPrompt {
    answers: Mutex<VecDeque<String>>,
    requests: Mutex<Vec<PromptRequest>>,
}

impl StaticPrompt {
    /// Answer every prompt with the same secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self::scripted([secret.into()])
    }

    /// Answer prompts in order; the last answer repeats
    pub fn scripted<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of prompts answered so far
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<PromptRequest> {
        self.requests.lock().clone()
    }
}

impl CredentialPrompt for StaticPrompt {
    fn prompt(&self, request: &PromptRequest) -> RedcapResult<Credential> {
        self.requests.lock().push(request.clone());
        let mut answers = self.answers.lock();
        let secret = if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        };
        match secret {
            Some(secret) => Ok(Credential {
                secret: Some(secret),
                ..Default::default()
            }),
            None => Err(RedcapError::Cancelled),
        }
    }
}

/// Prompt for non-interactive use; always fails
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl CredentialPrompt for NoPrompt {
    fn prompt(&self, request: &PromptRequest) -> RedcapResult<Credential> {
        let err = format!(
            "No credential available for {} and prompting is disabled",
            request.realm
        );
        Err(match &request.name {
            Some(name) => RedcapError::credential_named(err, name),
            None => RedcapError::credential(err),
        })
    }
}
