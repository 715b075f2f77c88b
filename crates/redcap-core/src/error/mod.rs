//! Error types for redcap-export
//!
//! A single error enum is shared by every component. Each variant carries a
//! human-readable message plus the context needed to diagnose the failure
//! without a stack trace (path, URL, field name). All errors implement
//! [`ErrorCode`], which exposes a stable code for programmatic handling.

mod codes;
mod constructors;
mod conversions;
mod types;

pub use codes::ErrorCode;
pub use types::{RedcapError, RedcapResult};
