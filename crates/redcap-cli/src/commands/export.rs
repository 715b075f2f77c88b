//! Export commands

use super::credential_resolver;
use crate::args::ExportOptions;
use crate::console::CliConsole;
use anyhow::Context;
use redcap_core::client::{ApiUrl, HttpConnector};
use redcap_core::config::RedcapConfig;
use redcap_core::dataset::{DatasetRepo, GitDataset, paths};
use redcap_core::export::{ExportJob, ExportKind, ExportPipeline};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A parsed export command line
#[derive(Debug)]
pub struct ExportCommand {
    pub url: String,
    pub outfile: PathBuf,
    pub kind: ExportKind,
    pub options: ExportOptions,
}

impl ExportCommand {
    /// Build the job for a dataset.
    ///
    /// With an explicit dataset the output file is relative to its root;
    /// otherwise it is relative to the working directory.
    pub fn job(&self, url: ApiUrl, cwd: &Path) -> ExportJob {
        let outfile = match self.options.dataset {
            Some(_) => self.outfile.clone(),
            None => paths::absolutize(cwd, &self.outfile),
        };
        let mut job =
            ExportJob::new(url, outfile, self.kind.clone()).with_save(!self.options.nosave);
        if let Some(name) = &self.options.credential {
            job = job.with_credential(name.as_str());
        }
        if let Some(message) = &self.options.message {
            job = job.with_message(message.as_str());
        }
        job
    }
}

async fn open_dataset(dataset: Option<&Path>, cwd: &Path) -> anyhow::Result<GitDataset> {
    let dataset = match dataset {
        Some(path) => GitDataset::open(&paths::absolutize(cwd, path))?,
        None => GitDataset::discover(cwd).await?,
    };
    Ok(dataset)
}

pub async fn run(
    command: ExportCommand,
    config: &RedcapConfig,
    console: &CliConsole,
) -> anyhow::Result<bool> {
    let url = ApiUrl::parse(&command.url)?;
    command.kind.validate()?;
    let cwd = std::env::current_dir().context("Cannot determine the working directory")?;

    let dataset = open_dataset(command.options.dataset.as_deref(), &cwd).await?;
    console.info(&format!("Exporting into dataset {}", dataset.root().display()));

    let pipeline = ExportPipeline::new(
        Arc::new(dataset),
        Arc::new(credential_resolver(config)),
        Arc::new(HttpConnector::new(config.http.clone())),
    );

    let result = pipeline.run(&command.job(url, &cwd)).await?;
    console.print_result(&result);
    Ok(result.is_ok())
}
