//! redcap-export
//!
//! Export REDCap project data into versioned (git / git-annex) datasets.
//! This crate re-exports [`redcap_core`]; the `redcap` binary lives in the
//! `redcap-cli` crate.

pub use redcap_core::*;
