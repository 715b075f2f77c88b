//! REDCap project API access
//!
//! Only the handful of exports the commands need are modelled. Everything
//! goes through [`RedcapApi`], so the export pipeline can run against a
//! mock or a fake.

mod http;
mod types;
mod validation;

pub use http::{HttpConnector, RedcapClient, error_message};
pub use types::{Instrument, ProjectXmlRequest, RecordsRequest};
pub use validation::{ApiUrl, SUPER_TOKEN_LENGTH, TOKEN_LENGTH, validate_token};

use crate::error::RedcapResult;
use async_trait::async_trait;
use std::sync::Arc;

/// Exports offered by a REDCap project
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RedcapApi: Send + Sync {
    /// Records of the given forms as flat CSV
    async fn export_records(&self, request: &RecordsRequest) -> RedcapResult<String>;

    /// A saved report as CSV
    async fn export_report(&self, report_id: &str) -> RedcapResult<String>;

    /// The project as CDISC ODM XML
    async fn export_project_xml(&self, request: &ProjectXmlRequest) -> RedcapResult<String>;

    async fn export_instruments(&self) -> RedcapResult<Vec<Instrument>>;
}

/// Builds API clients for a URL and token
pub trait ApiConnector: Send + Sync {
    fn connect(&self, url: &ApiUrl, token: &str) -> RedcapResult<Arc<dyn RedcapApi>>;
}

/// Connector handing out one prepared client, recording the tokens it saw
pub struct FixedConnector {
    api: Arc<dyn RedcapApi>,
    tokens: parking_lot::Mutex<Vec<String>>,
}

impl FixedConnector {
    pub fn new(api: Arc<dyn RedcapApi>) -> Self {
        Self {
            api,
            tokens: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Tokens passed to `connect`, in order
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().clone()
    }
}

impl ApiConnector for FixedConnector {
    fn connect(&self, _url: &ApiUrl, token: &str) -> RedcapResult<Arc<dyn RedcapApi>> {
        self.tokens.lock().push(token.to_string());
        Ok(self.api.clone())
    }
}
