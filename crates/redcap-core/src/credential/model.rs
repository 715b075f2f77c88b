//! Credential data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type hint attached to REDCap credentials
pub const TOKEN_TYPE: &str = "token";

/// Prefix of default credential names
pub const DEFAULT_NAME_PREFIX: &str = "redcap";

/// A credential field that a caller may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialField {
    Secret,
    Realm,
}

impl fmt::Display for CredentialField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialField::Secret => write!(f, "secret"),
            CredentialField::Realm => write!(f, "realm"),
        }
    }
}

/// Properties of a stored or prompted credential
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    /// API URL the credential is used for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl Credential {
    /// A token credential for a realm
    pub fn token(secret: impl Into<String>, realm: impl Into<String>) -> Self {
        Self {
            secret: Some(secret.into()),
            realm: Some(realm.into()),
            kind: Some(TOKEN_TYPE.to_string()),
            last_used: None,
        }
    }

    /// Whether the field is present and non-empty
    pub fn has(&self, field: CredentialField) -> bool {
        let value = match field {
            CredentialField::Secret => &self.secret,
            CredentialField::Realm => &self.realm,
        };
        value.as_deref().is_some_and(|v| !v.is_empty())
    }

    /// Required fields this credential lacks
    pub fn missing(&self, required: &[CredentialField]) -> Vec<CredentialField> {
        let mut missing: Vec<CredentialField> = required
            .iter()
            .copied()
            .filter(|field| !self.has(*field))
            .collect();
        missing.dedup();
        missing
    }

    /// Secret with everything but the first and last characters hidden
    pub fn masked_secret(&self) -> String {
        match &self.secret {
            Some(v) if v.chars().count() > 8 => {
                let chars: Vec<char> = v.chars().collect();
                let prefix: String = chars[..3].iter().collect();
                let suffix: String = chars[chars.len() - 3..].iter().collect();
                format!("{}...{}", prefix, suffix)
            }
            Some(v) => "*".repeat(v.chars().count()),
            None => "(missing)".to_string(),
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("secret", &self.masked_secret())
            .field("realm", &self.realm)
            .field("kind", &self.kind)
            .field("last_used", &self.last_used)
            .finish()
    }
}

/// Result of [`CredentialResolver::obtain`](super::CredentialResolver::obtain)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObtainedCredential {
    /// Name the credential was found under, or the name the caller asked for
    pub name: Option<String>,
    pub credential: Credential,
    /// Whether the user was prompted for any part of it
    pub prompted: bool,
}

impl ObtainedCredential {
    /// The secret; obtain() guarantees one is present
    pub fn secret(&self) -> &str {
        self.credential.secret.as_deref().unwrap_or_default()
    }
}

/// Default name for a credential: `redcap-<realm>`, or `redcap` without a realm
pub fn default_credential_name(realm: Option<&str>) -> String {
    match realm {
        Some(realm) if !realm.is_empty() => format!("{}-{}", DEFAULT_NAME_PREFIX, realm),
        _ => DEFAULT_NAME_PREFIX.to_string(),
    }
}
