//! Query command: list the instruments of a project

use super::credential_resolver;
use crate::console::CliConsole;
use anyhow::Context;
use redcap_core::client::{ApiUrl, HttpConnector};
use redcap_core::config::RedcapConfig;
use redcap_core::export::query_instruments;

pub async fn run(
    url: &str,
    credential: Option<&str>,
    config: &RedcapConfig,
    console: &CliConsole,
) -> anyhow::Result<bool> {
    let url = ApiUrl::parse(url)?;
    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;

    let resolver = credential_resolver(config);
    let connector = HttpConnector::new(config.http.clone());
    let (result, instruments) =
        query_instruments(&resolver, &connector, &url, credential, &cwd).await?;

    if console.is_json() {
        console.print_result(&result);
    } else {
        console.print_instruments(&instruments);
    }
    Ok(result.is_ok())
}
