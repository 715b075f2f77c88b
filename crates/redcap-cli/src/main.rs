//! redcap command-line tool
//!
//! Exports REDCap project data into a git / git-annex dataset and commits
//! it. See `redcap --help` for the commands.

mod args;
mod commands;
mod console;
mod prompt;
mod router;

use crate::args::Cli;
use crate::console::CliConsole;
use clap::Parser;
use redcap_core::config::load_config;
use redcap_core::error::{ErrorCode, RedcapError};
use redcap_core::logging;
use std::process::ExitCode;

// The logging guard is thread-local, so everything runs on this thread
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let console = CliConsole::new(cli.verbose, cli.json);

    let mut config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            console.error(&e.to_string());
            return ExitCode::FAILURE;
        }
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    let _logging = logging::init(&config.logging);

    match router::route(cli, &config, &console).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            match e.downcast_ref::<RedcapError>() {
                Some(err) => console.error(&format!("{} [{}]", err, err.error_code())),
                None => console.error(&format!("{:#}", e)),
            }
            ExitCode::FAILURE
        }
    }
}
