//! Core library of redcap-export
//!
//! Exports data from a REDCap project API into a versioned dataset (a git
//! repository, optionally with git-annex). The interesting parts are the
//! [`gate`], which decides whether an output file may be overwritten, and
//! the [`credential`] resolver, which finds and records API tokens. The
//! [`export`] pipeline ties these together with the [`client`] and
//! [`dataset`] adapters.

pub mod client;
pub mod config;
pub mod credential;
pub mod dataset;
pub mod error;
pub mod export;
pub mod gate;
pub mod logging;

pub use client::{ApiConnector, ApiUrl, HttpConnector, Instrument, RedcapApi, RedcapClient};
pub use config::{RedcapConfig, load_config};
pub use credential::{
    Credential, CredentialField, CredentialPrompt, CredentialResolver, CredentialStore,
    FileCredentialStore, MemoryCredentialStore, ObtainedCredential,
};
pub use dataset::{DatasetRepo, GitDataset, MemoryDataset};
pub use error::{ErrorCode, RedcapError, RedcapResult};
pub use export::{ExportJob, ExportKind, ExportPipeline, ExportResult, ExportStatus};
pub use gate::{PathState, WriteDecision, check_ok_to_edit};
