//! Export control flow
//!
//! Every export runs the same sequence: check that the output file may be
//! written, obtain a token, call the API, record the token, unlock the file
//! if needed, write it, and optionally save the dataset. A refused output
//! path ends the run before any prompt or network activity; an API failure
//! ends it before the credential store or the file is touched.

use super::commit;
use super::result::ExportResult;
use crate::client::{
    ApiConnector, ApiUrl, Instrument, ProjectXmlRequest, RecordsRequest, RedcapApi,
};
use crate::credential::{CredentialField, CredentialResolver, ObtainedCredential};
use crate::dataset::DatasetRepo;
use crate::error::{RedcapError, RedcapResult};
use crate::gate::check_ok_to_edit;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Result message when the output path may not be written
pub const NOT_WRITABLE_MESSAGE: &str = "Output file status is not clean or the file does not belong directly to the reference dataset.";

pub const QUERY_ACTION: &str = "redcap_query";

const REQUIRED_FIELDS: &[CredentialField] = &[CredentialField::Secret];

/// What to export
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportKind {
    /// Records of one or more forms, as CSV
    Forms {
        forms: Vec<String>,
        survey_fields: bool,
    },
    /// A saved report, as CSV
    Report { report_id: String },
    /// The whole project, as XML
    ProjectXml(ProjectXmlRequest),
}

impl ExportKind {
    pub fn action(&self) -> &'static str {
        match self {
            ExportKind::Forms { .. } => "export_redcap_form",
            ExportKind::Report { .. } => "export_redcap_report",
            ExportKind::ProjectXml(_) => "export_redcap_project_xml",
        }
    }

    pub fn default_message(&self) -> String {
        match self {
            ExportKind::Forms { forms, .. } => commit::forms_message(forms),
            ExportKind::Report { .. } => commit::report_message(),
            ExportKind::ProjectXml(request) => {
                commit::project_xml_message(request.metadata_only, request.survey_fields)
            }
        }
    }

    pub fn validate(&self) -> RedcapResult<()> {
        match self {
            ExportKind::Forms { forms, .. } => {
                if forms.is_empty() {
                    return Err(RedcapError::validation(
                        "forms",
                        "at least one form name is required",
                    ));
                }
                if forms.iter().any(|f| f.trim().is_empty()) {
                    return Err(RedcapError::validation("forms", "form names must not be empty"));
                }
            }
            ExportKind::Report { report_id } => {
                if report_id.trim().is_empty() {
                    return Err(RedcapError::validation("report_id", "must not be empty"));
                }
            }
            ExportKind::ProjectXml(_) => {}
        }
        Ok(())
    }

    async fn fetch(&self, api: &dyn RedcapApi) -> RedcapResult<String> {
        match self {
            ExportKind::Forms {
                forms,
                survey_fields,
            } => {
                api.export_records(&RecordsRequest {
                    forms: forms.clone(),
                    survey_fields: *survey_fields,
                })
                .await
            }
            ExportKind::Report { report_id } => api.export_report(report_id).await,
            ExportKind::ProjectXml(request) => api.export_project_xml(request).await,
        }
    }
}

/// One export command invocation
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub url: ApiUrl,
    /// Output file; relative paths are relative to the dataset root
    pub outfile: PathBuf,
    pub kind: ExportKind,
    /// Credential name to use instead of a realm lookup
    pub credential: Option<String>,
    /// Commit message replacing the default one
    pub message: Option<String>,
    pub save: bool,
}

impl ExportJob {
    pub fn new(url: ApiUrl, outfile: impl Into<PathBuf>, kind: ExportKind) -> Self {
        Self {
            url,
            outfile: outfile.into(),
            kind,
            credential: None,
            message: None,
            save: true,
        }
    }

    pub fn with_credential(mut self, name: impl Into<String>) -> Self {
        self.credential = Some(name.into());
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_save(mut self, save: bool) -> Self {
        self.save = save;
        self
    }

    pub fn commit_message(&self) -> String {
        self.message
            .clone()
            .unwrap_or_else(|| self.kind.default_message())
    }
}

/// Obtain a token and build a client for it
fn connect(
    resolver: &CredentialResolver,
    connector: &dyn ApiConnector,
    url: &ApiUrl,
    credential: Option<&str>,
) -> RedcapResult<(ObtainedCredential, Arc<dyn RedcapApi>)> {
    let obtained = resolver.obtain(credential, url.as_str(), REQUIRED_FIELDS)?;
    let api = connector.connect(url, obtained.secret())?;
    Ok((obtained, api))
}

/// Runs exports into one dataset
pub struct ExportPipeline {
    dataset: Arc<dyn DatasetRepo>,
    resolver: Arc<CredentialResolver>,
    connector: Arc<dyn ApiConnector>,
}

impl ExportPipeline {
    pub fn new(
        dataset: Arc<dyn DatasetRepo>,
        resolver: Arc<CredentialResolver>,
        connector: Arc<dyn ApiConnector>,
    ) -> Self {
        Self {
            dataset,
            resolver,
            connector,
        }
    }

    pub fn dataset(&self) -> &Arc<dyn DatasetRepo> {
        &self.dataset
    }

    /// Run one export.
    ///
    /// Validation, credential and API failures are returned as errors. A
    /// refused output path and failures while writing or saving are
    /// reported in the returned result.
    pub async fn run(&self, job: &ExportJob) -> RedcapResult<ExportResult> {
        job.kind.validate()?;
        let action = job.kind.action();
        let path = self.dataset.resolve(&job.outfile);

        let decision = check_ok_to_edit(&path, self.dataset.as_ref()).await;
        if !decision.ok {
            return Ok(ExportResult::error(action, path, NOT_WRITABLE_MESSAGE));
        }

        let (obtained, api) = connect(
            &self.resolver,
            self.connector.as_ref(),
            &job.url,
            job.credential.as_deref(),
        )?;
        let content = job.kind.fetch(api.as_ref()).await?;
        debug!("{} returned {} bytes", action, content.len());

        self.resolver.update(&obtained);

        if decision.needs_unlock {
            if let Err(e) = self.dataset.unlock(&path).await {
                return Ok(ExportResult::error(action, path, e.to_string()));
            }
        }

        if let Err(e) = write_output(&path, &content).await {
            return Ok(ExportResult::error(action, path, e.to_string()));
        }

        if job.save {
            let message = job.commit_message();
            if let Err(e) = self.dataset.save(&[path.clone()], &message).await {
                return Ok(ExportResult::error(action, path, e.to_string()));
            }
            info!("Saved {} to the dataset", path.display());
        }

        Ok(ExportResult::ok(action, path))
    }
}

async fn write_output(path: &Path, content: &str) -> RedcapResult<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| RedcapError::io_at(e.to_string(), parent))?;
    }
    tokio::fs::write(path, content)
        .await
        .map_err(|e| RedcapError::io_at(e.to_string(), path))
}

/// List the instruments of a project.
///
/// Uses the same credential protocol as the exports. The result carries the
/// instruments under `data.instruments`.
pub async fn query_instruments(
    resolver: &CredentialResolver,
    connector: &dyn ApiConnector,
    url: &ApiUrl,
    credential: Option<&str>,
    cwd: &Path,
) -> RedcapResult<(ExportResult, Vec<Instrument>)> {
    let (obtained, api) = connect(resolver, connector, url, credential)?;
    let instruments = api.export_instruments().await?;
    resolver.update(&obtained);

    let result = ExportResult::ok(QUERY_ACTION, cwd).with_data(json!({
        "instruments": instruments,
    }));
    Ok((result, instruments))
}
