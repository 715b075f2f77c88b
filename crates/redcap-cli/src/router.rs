//! Command routing logic for CLI

use crate::args::{Cli, Commands};
use crate::commands;
use crate::commands::export::ExportCommand;
use crate::console::CliConsole;
use redcap_core::client::ProjectXmlRequest;
use redcap_core::config::RedcapConfig;
use redcap_core::export::ExportKind;

/// Route a parsed command line to its handler.
///
/// Returns whether every result was ok.
pub async fn route(cli: Cli, config: &RedcapConfig, console: &CliConsole) -> anyhow::Result<bool> {
    match cli.command {
        Commands::ExportForm {
            url,
            forms,
            outfile,
            no_survey_fields,
            options,
        } => {
            let kind = ExportKind::Forms {
                forms,
                survey_fields: !no_survey_fields,
            };
            commands::export::run(
                ExportCommand {
                    url,
                    outfile,
                    kind,
                    options,
                },
                config,
                console,
            )
            .await
        }
        Commands::ExportReport {
            url,
            report_id,
            outfile,
            options,
        } => {
            let kind = ExportKind::Report { report_id };
            commands::export::run(
                ExportCommand {
                    url,
                    outfile,
                    kind,
                    options,
                },
                config,
                console,
            )
            .await
        }
        Commands::ExportProjectXml {
            url,
            outfile,
            metadata_only,
            no_survey_fields,
            options,
        } => {
            let kind = ExportKind::ProjectXml(ProjectXmlRequest {
                metadata_only,
                survey_fields: !no_survey_fields,
                ..Default::default()
            });
            commands::export::run(
                ExportCommand {
                    url,
                    outfile,
                    kind,
                    options,
                },
                config,
                console,
            )
            .await
        }
        Commands::Query { url, credential } => {
            commands::query::run(&url, credential.as_deref(), config, console).await
        }
    }
}
