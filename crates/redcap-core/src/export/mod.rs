//! Export commands: control flow, commit messages and results

pub mod commit;
mod pipeline;
mod result;

pub use pipeline::{
    ExportJob, ExportKind, ExportPipeline, NOT_WRITABLE_MESSAGE, QUERY_ACTION, query_instruments,
};
pub use result::{ExportResult, ExportStatus};
