//! End-to-end export scenarios
//!
//! These run the full pipeline against in-memory and real git datasets with
//! a scripted REDCap server and token prompt.

use async_trait::async_trait;
use redcap_export::client::{
    ApiConnector, ApiUrl, FixedConnector, Instrument, ProjectXmlRequest, RecordsRequest,
    RedcapApi,
};
use redcap_export::credential::{
    CredentialResolver, CredentialStore, FileCredentialStore, MemoryCredentialStore, StaticPrompt,
};
use redcap_export::dataset::{DatasetRepo, GitDataset, MemoryDataset, PathKind, PathStatus};
use redcap_export::export::{ExportJob, ExportKind, ExportPipeline, NOT_WRITABLE_MESSAGE};
use redcap_export::{ExportStatus, RedcapError, RedcapResult};
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const URL: &str = "https://www.example.com/api/";
const TOKEN: &str = "WTJ3G8XWO9G8V1BB4K8N81KNGRPFJOVL";

/// REDCap stand-in answering every export with fixed content
struct FakeRedcap {
    content: RedcapResult<String>,
    calls: AtomicUsize,
}

impl FakeRedcap {
    fn answering(content: &str) -> Self {
        Self {
            content: Ok(content.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            content: Err(RedcapError::api("Invalid token", Some(401))),
            calls: AtomicUsize::new(0),
        }
    }

    fn answer(&self) -> RedcapResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.content.clone()
    }
}

#[async_trait]
impl RedcapApi for FakeRedcap {
    async fn export_records(&self, _request: &RecordsRequest) -> RedcapResult<String> {
        self.answer()
    }

    async fn export_report(&self, _report_id: &str) -> RedcapResult<String> {
        self.answer()
    }

    async fn export_project_xml(&self, _request: &ProjectXmlRequest) -> RedcapResult<String> {
        self.answer()
    }

    async fn export_instruments(&self) -> RedcapResult<Vec<Instrument>> {
        self.answer().map(|_| Vec::new())
    }
}

fn report_job(outfile: &str) -> ExportJob {
    ExportJob::new(
        ApiUrl::parse(URL).unwrap(),
        outfile,
        ExportKind::Report {
            report_id: "12".to_string(),
        },
    )
}

fn pipeline(
    dataset: Arc<dyn DatasetRepo>,
    store: Arc<dyn CredentialStore>,
    prompt: Arc<StaticPrompt>,
    api: Arc<FakeRedcap>,
) -> ExportPipeline {
    let resolver = Arc::new(CredentialResolver::new(store, prompt));
    let connector: Arc<dyn ApiConnector> = Arc::new(FixedConnector::new(api));
    ExportPipeline::new(dataset, resolver, connector)
}

#[tokio::test]
async fn test_repeated_exports_prompt_once() {
    let temp = TempDir::new().unwrap();
    let dataset = Arc::new(MemoryDataset::new(temp.path()));
    let store = Arc::new(MemoryCredentialStore::new());
    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let api = Arc::new(FakeRedcap::answering("id\n1\n"));
    let pipeline = pipeline(dataset.clone(), store.clone(), prompt.clone(), api.clone());

    for _ in 0..2 {
        let result = pipeline.run(&report_job("report.csv")).await.unwrap();
        assert_eq!(result.status, ExportStatus::Ok);
    }

    assert_eq!(prompt.calls(), 1);
    assert_eq!(api.calls.load(Ordering::SeqCst), 2);
    assert_eq!(store.names(), vec![format!("redcap-{}", URL)]);
    assert_eq!(dataset.saves().len(), 2);
}

#[tokio::test]
async fn test_subdataset_target_is_refused() {
    let temp = TempDir::new().unwrap();
    let dataset = Arc::new(MemoryDataset::new(temp.path()).with_subdataset("subds"));
    let store = Arc::new(MemoryCredentialStore::new());
    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let api = Arc::new(FakeRedcap::answering("id\n1\n"));
    let pipeline = pipeline(dataset, store.clone(), prompt.clone(), api.clone());

    let result = pipeline.run(&report_job("subds/file")).await.unwrap();

    assert_eq!(result.status, ExportStatus::Error);
    assert_eq!(result.message.as_deref(), Some(NOT_WRITABLE_MESSAGE));
    assert_eq!(prompt.calls(), 0);
    assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_failed_request_keeps_existing_file() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("report.csv"), "old").unwrap();
    let dataset = Arc::new(
        MemoryDataset::new(temp.path()).with_entry("report.csv", PathKind::File, PathStatus::Clean),
    );
    let store = Arc::new(MemoryCredentialStore::new());
    let api = Arc::new(FakeRedcap::failing());
    let pipeline = pipeline(
        dataset.clone(),
        store.clone(),
        Arc::new(StaticPrompt::new(TOKEN)),
        api,
    );

    let err = pipeline.run(&report_job("report.csv")).await.unwrap_err();

    assert!(matches!(err, RedcapError::Api { .. }));
    assert!(store.is_empty());
    assert_eq!(
        std::fs::read_to_string(temp.path().join("report.csv")).unwrap(),
        "old"
    );
    assert!(dataset.saves().is_empty());
}

fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[tokio::test]
async fn test_export_into_git_dataset() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let temp = TempDir::new().unwrap();
    let ds_path = temp.path().join("ds");
    std::fs::create_dir_all(&ds_path).unwrap();
    git(&ds_path, &["init", "--quiet"]);
    git(&ds_path, &["config", "user.name", "test"]);
    git(&ds_path, &["config", "user.email", "test@example.com"]);

    let dataset = Arc::new(GitDataset::open(&ds_path).unwrap());
    let store = Arc::new(FileCredentialStore::new(temp.path().join("credentials.json")));
    let prompt = Arc::new(StaticPrompt::new(TOKEN));
    let api = Arc::new(FakeRedcap::answering("record_id\n1\n2\n"));
    let pipeline = pipeline(dataset, store.clone(), prompt, api);

    let job = ExportJob::new(
        ApiUrl::parse(URL).unwrap(),
        "data/forms.csv",
        ExportKind::Forms {
            forms: vec!["demographics".to_string(), "baseline".to_string()],
            survey_fields: true,
        },
    );
    let result = pipeline.run(&job).await.unwrap();
    assert_eq!(result.status, ExportStatus::Ok, "{:?}", result.message);

    let log = git(&ds_path, &["log", "-1", "--format=%B"]);
    assert!(log.starts_with("Export REDCap forms\n\nContains the following forms: demographics, baseline."));
    assert!(git(&ds_path, &["status", "--porcelain"]).trim().is_empty());
    assert!(
        store
            .get(&format!("redcap-{}", URL))
            .unwrap()
            .is_some_and(|c| c.last_used.is_some())
    );

    // the committed file is clean again, so a second export may overwrite it
    let again = pipeline.run(&job).await.unwrap();
    assert_eq!(again.status, ExportStatus::Ok);

    // local edits are protected
    std::fs::write(ds_path.join("data/forms.csv"), "edited").unwrap();
    let refused = pipeline.run(&job).await.unwrap();
    assert_eq!(refused.status, ExportStatus::Error);
    assert_eq!(
        std::fs::read_to_string(ds_path.join("data/forms.csv")).unwrap(),
        "edited"
    );
}
