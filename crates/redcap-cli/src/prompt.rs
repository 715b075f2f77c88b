//! Terminal token prompt

use dialoguer::{Password, theme::ColorfulTheme};
use redcap_core::credential::{Credential, CredentialPrompt, PromptRequest};
use redcap_core::error::{RedcapError, RedcapResult};
use std::io::IsTerminal;

/// Asks for the token with hidden input; refuses without a terminal
pub struct DialoguerPrompt;

impl CredentialPrompt for DialoguerPrompt {
    fn prompt(&self, request: &PromptRequest) -> RedcapResult<Credential> {
        if !std::io::stdin().is_terminal() {
            return Err(RedcapError::credential(format!(
                "{} ({}), but no terminal is available to ask for it",
                request.message, request.realm
            )));
        }

        eprintln!("{}", request.message);
        eprintln!("  realm: {}", request.realm);
        if let Some(name) = &request.name {
            eprintln!("  credential: {}", name);
        }

        let secret = Password::with_theme(&ColorfulTheme::default())
            .with_prompt(request.type_hint.as_str())
            .interact()
            .map_err(|e| match e {
                dialoguer::Error::IO(io) if io.kind() == std::io::ErrorKind::Interrupted => {
                    RedcapError::Cancelled
                }
                other => RedcapError::credential(other.to_string()),
            })?;

        Ok(Credential {
            secret: Some(secret),
            ..Default::default()
        })
    }
}
