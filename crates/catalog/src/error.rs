//! Error types for the catalog crate.
//!
//! Everything that can go wrong while loading, validating or querying the
//! shop snapshot ends up in [`CatalogError`]. The recommendation engine itself
//! never produces these: by the time it runs, its inputs are already fetched.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or querying the catalog store
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Snapshot file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: PathBuf },

    /// I/O error occurred while reading a file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A snapshot file was not valid JSON for the expected shape
    #[error("Parse error in {file}: {source}")]
    ParseError {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    /// A field had a value outside its allowed range
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Two products share the same identifier
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(String),

    /// Two client profiles share the same identifier
    #[error("Duplicate client id: {0}")]
    DuplicateClient(String),

    /// Referenced entity doesn't exist (e.g. interaction for a removed product)
    #[error("Missing reference: {entity} with id {id}")]
    MissingReference { entity: String, id: String },

    /// Lookup for a client that has no profile in the store
    #[error("Unknown client: {0}")]
    UnknownClient(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
