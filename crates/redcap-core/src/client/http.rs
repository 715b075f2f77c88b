//! reqwest implementation of the REDCap API

use super::types::{Instrument, ProjectXmlRequest, RecordsRequest};
use super::validation::{ApiUrl, validate_token};
use super::{ApiConnector, RedcapApi};
use crate::config::HttpConfig;
use crate::error::{RedcapError, RedcapResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

type Form = Vec<(String, String)>;

fn flag(value: bool) -> String {
    let text = if value { "true" } else { "false" };
    text.to_string()
}

fn pair(key: &str, value: impl Into<String>) -> (String, String) {
    (key.to_string(), value.into())
}

/// Form fields for a records export
pub fn records_form(request: &RecordsRequest) -> Form {
    let mut form = vec![
        pair("content", "record"),
        pair("format", "csv"),
        pair("type", "flat"),
    ];
    for (i, name) in request.forms.iter().enumerate() {
        form.push(pair(&format!("forms[{}]", i), name.as_str()));
    }
    form.push(pair("exportSurveyFields", flag(request.survey_fields)));
    form
}

/// Form fields for a report export
pub fn report_form(report_id: &str) -> Form {
    vec![
        pair("content", "report"),
        pair("report_id", report_id),
        pair("format", "csv"),
    ]
}

/// Form fields for a project XML export
pub fn project_xml_form(request: &ProjectXmlRequest) -> Form {
    vec![
        pair("content", "project_xml"),
        pair("returnMetadataOnly", flag(request.metadata_only)),
        pair("exportFiles", flag(request.files)),
        pair("exportSurveyFields", flag(request.survey_fields)),
        pair("exportDataAccessGroups", flag(request.dags)),
        pair("format", "xml"),
    ]
}

/// Form fields for an instrument listing
pub fn instruments_form() -> Form {
    vec![pair("content", "instrument"), pair("format", "json")]
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Turn a failed response body into a readable message
pub fn error_message(status: u16, body: &str) -> String {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return parsed.error;
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("request failed with HTTP status {}", status)
    } else {
        let snippet: String = trimmed.chars().take(200).collect();
        format!("HTTP {}: {}", status, snippet)
    }
}

/// Client for one REDCap project, bound to a URL and a token
pub struct RedcapClient {
    http: reqwest::Client,
    url: ApiUrl,
    token: String,
}

impl RedcapClient {
    pub fn new(url: ApiUrl, token: impl Into<String>, config: &HttpConfig) -> RedcapResult<Self> {
        let token = token.into();
        validate_token(&token)?;

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify_ssl)
            .timeout(config.timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| RedcapError::http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, url, token })
    }

    pub fn url(&self) -> &ApiUrl {
        &self.url
    }

    async fn post(&self, mut form: Form) -> RedcapResult<String> {
        let content = form
            .first()
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        form.push(pair("token", self.token.as_str()));
        form.push(pair("returnFormat", "json"));

        debug!("POST {} content={}", self.url, content);
        let response = self
            .http
            .post(self.url.url().clone())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!("REDCap answered {} ({} bytes)", status.as_u16(), body.len());

        if !status.is_success() {
            return Err(RedcapError::api(
                error_message(status.as_u16(), &body),
                Some(status.as_u16()),
            ));
        }
        Ok(body)
    }
}

#[async_trait]
impl RedcapApi for RedcapClient {
    async fn export_records(&self, request: &RecordsRequest) -> RedcapResult<String> {
        self.post(records_form(request)).await
    }

    async fn export_report(&self, report_id: &str) -> RedcapResult<String> {
        self.post(report_form(report_id)).await
    }

    async fn export_project_xml(&self, request: &ProjectXmlRequest) -> RedcapResult<String> {
        self.post(project_xml_form(request)).await
    }

    async fn export_instruments(&self) -> RedcapResult<Vec<Instrument>> {
        let body = self.post(instruments_form()).await?;
        serde_json::from_str(&body).map_err(|e| {
            RedcapError::api(format!("Unexpected instrument listing: {}", e), None)
        })
    }
}

/// Connector producing [`RedcapClient`]s from the HTTP settings
#[derive(Debug, Clone, Default)]
pub struct HttpConnector {
    config: HttpConfig,
}

impl HttpConnector {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }
}

impl ApiConnector for HttpConnector {
    fn connect(&self, url: &ApiUrl, token: &str) -> RedcapResult<Arc<dyn RedcapApi>> {
        Ok(Arc::new(RedcapClient::new(url.clone(), token, &self.config)?))
    }
}
