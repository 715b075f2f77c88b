//! CLI argument definitions using clap
//!
//! - redcap export-form URL FORM... OUTFILE
//! - redcap export-report URL REPORT_ID OUTFILE
//! - redcap export-project-xml URL OUTFILE
//! - redcap query URL

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "redcap")]
#[command(about = "Export REDCap project data into a versioned dataset")]
#[command(
    long_about = r#"Export REDCap project data into a versioned dataset

USAGE:
  redcap export-form <URL> <FORM>... <OUTFILE>     # Records of selected forms (CSV)
  redcap export-report <URL> <REPORT_ID> <OUTFILE> # A saved report (CSV)
  redcap export-project-xml <URL> <OUTFILE>        # The whole project (XML)
  redcap query <URL>                               # List instruments

A token for the API URL is taken from the credential store, or prompted
for and stored after the first successful request."#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Print results as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by the export commands
#[derive(Args, Debug, Clone, Default)]
pub struct ExportOptions {
    /// Dataset in which the output file is saved; OUTFILE is relative to it.
    /// Defaults to the dataset containing the working directory.
    #[arg(short = 'd', long, value_name = "PATH")]
    pub dataset: Option<PathBuf>,

    /// Name of the credential providing the API token
    #[arg(long, value_name = "NAME")]
    pub credential: Option<String>,

    /// Commit message to use instead of the generated one
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Do not save the dataset after writing the file
    #[arg(long)]
    pub nosave: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export records from selected forms (instruments) to a CSV file
    #[command(verbatim_doc_comment)]
    ExportForm {
        /// API URL of a REDCap server
        url: String,

        /// Project form name(s)
        #[arg(value_name = "FORM", required = true, num_args = 1..)]
        forms: Vec<String>,

        /// File to write; an existing file is overwritten
        outfile: PathBuf,

        /// Do not include survey identifier or timestamp fields
        #[arg(long = "no-survey-fields")]
        no_survey_fields: bool,

        #[command(flatten)]
        options: ExportOptions,
    },

    /// Export a saved report to a CSV file
    #[command(verbatim_doc_comment)]
    ExportReport {
        /// API URL of a REDCap server
        url: String,

        /// Report ID, shown in the report list of the project
        report_id: String,

        /// File to write; an existing file is overwritten
        outfile: PathBuf,

        #[command(flatten)]
        options: ExportOptions,
    },

    /// Export the whole project (metadata and data) as CDISC ODM XML
    #[command(verbatim_doc_comment)]
    ExportProjectXml {
        /// API URL of a REDCap server
        url: String,

        /// File to write; an existing file is overwritten
        outfile: PathBuf,

        /// Only export metadata (fields, forms, events, arms), no data
        #[arg(long)]
        metadata_only: bool,

        /// Do not include survey identifier or timestamp fields
        #[arg(long = "no-survey-fields")]
        no_survey_fields: bool,

        #[command(flatten)]
        options: ExportOptions,
    },

    /// List the instruments (data entry forms) of a project
    #[command(verbatim_doc_comment)]
    Query {
        /// API URL of a REDCap server
        url: String,

        /// Name of the credential providing the API token
        #[arg(long, value_name = "NAME")]
        credential: Option<String>,
    },
}
