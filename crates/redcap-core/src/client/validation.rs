//! Validation of API URLs and tokens

use crate::error::{RedcapError, RedcapResult};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// A validated REDCap API URL.
///
/// The URL must use http or https and name both a host and a path, e.g.
/// `https://redcap.example.org/api/`. The text as given is kept verbatim
/// since it doubles as the credential realm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl {
    raw: String,
    url: Url,
}

impl ApiUrl {
    pub fn parse(raw: &str) -> RedcapResult<Self> {
        let invalid = |message: String| RedcapError::validation("url", message);

        let url = Url::parse(raw).map_err(|e| invalid(format!("'{}' is not a URL: {}", raw, e)))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(invalid(format!(
                    "scheme '{}' not allowed, use http or https",
                    scheme
                )));
            }
        }

        if url.host_str().is_none_or(str::is_empty) {
            return Err(invalid(format!("'{}' has no host", raw)));
        }

        // The url crate turns a missing path into "/", so look at the text
        let has_path = raw
            .split_once("://")
            .map(|(_, rest)| rest.contains('/'))
            .unwrap_or(false);
        if !has_path {
            return Err(invalid(format!(
                "'{}' has no path, expected something like https://host/api/",
                raw
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            url,
        })
    }

    /// The URL as given; used as credential realm
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl FromStr for ApiUrl {
    type Err = RedcapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Length of a project token
pub const TOKEN_LENGTH: usize = 32;
/// Length of a super token
pub const SUPER_TOKEN_LENGTH: usize = 64;

/// Check the shape of a REDCap API token
pub fn validate_token(token: &str) -> RedcapResult<()> {
    let len = token.chars().count();
    if len != TOKEN_LENGTH && len != SUPER_TOKEN_LENGTH {
        return Err(RedcapError::validation(
            "token",
            format!(
                "expected {} or {} characters, got {}",
                TOKEN_LENGTH, SUPER_TOKEN_LENGTH, len
            ),
        ));
    }
    if !token.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(RedcapError::validation(
            "token",
            "only letters and digits are allowed",
        ));
    }
    Ok(())
}
