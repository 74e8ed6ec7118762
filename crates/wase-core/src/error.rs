//! # Errors
//!
//! Failures raised while building queries or reading result documents.

use thiserror::Error;

/// Invalid user input detected before anything is sent to the engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("invalid response code range '{entry}': bounds must be integers")]
    InvalidRange { entry: String },
}

/// A requested field path is absent on a document.
///
/// Recovered per row by the flattener; never fatal.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("field '{path}' not present in document")]
pub struct FieldLookupError {
    pub path: String,
}
