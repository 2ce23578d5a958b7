//! Error types for the catalog crate.
//!
//! Building a catalog can only fail in one way (nothing usable survived
//! cleaning). Loading a movie table from disk adds the usual I/O and
//! parsing failures on top of that.

use thiserror::Error;

/// Errors that can occur while loading movie rows or building a catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Zero records survived cleaning, so there is no corpus to index
    #[error("Catalog is empty: no usable movie records (received {received})")]
    EmptyCorpus { received: usize },

    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The movie table is not valid JSON
    #[error("JSON error in {file}: {source}")]
    JsonError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A row could not be turned into a movie record
    ///
    /// `line` is the 1-based line of the JSONL or CSV file
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A data field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
