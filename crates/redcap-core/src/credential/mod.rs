//! REDCap API token management
//!
//! Tokens are kept in a [`CredentialStore`] keyed by name and matched by
//! realm (the API URL). The [`CredentialResolver`] looks them up, prompts
//! through a [`CredentialPrompt`] when needed, and records successful use.

mod file_store;
mod memory;
mod model;
mod prompt;
mod resolver;
mod store;

pub use file_store::{CredentialsFile, FileCredentialStore};
pub use memory::MemoryCredentialStore;
pub use model::{
    Credential, CredentialField, DEFAULT_NAME_PREFIX, ObtainedCredential, TOKEN_TYPE,
    default_credential_name,
};
pub use prompt::{CredentialPrompt, NoPrompt, PromptRequest, StaticPrompt, TOKEN_PROMPT};
pub use resolver::CredentialResolver;
pub use store::CredentialStore;
