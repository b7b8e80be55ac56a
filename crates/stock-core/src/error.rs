//! Provider error handling
//!
//! Routing and validation failures are caller-input problems and are raised
//! before the store is touched. Store failures are surfaced verbatim.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while opening the backing database
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to create the directory holding the database file
    #[error("Failed to create data directory '{path}': {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// SQLite could not open the database file
    #[error("Failed to open database at '{path}': {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// SQLite database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Errors returned by `StockProvider` operations
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The identifier matches no known route
    #[error("Unknown URI {uri}")]
    UnrecognizedResource { uri: String },

    /// The route is known but the operation is not allowed on it
    #[error("{operation} is not supported for {uri}")]
    UnsupportedOperation {
        operation: &'static str,
        uri: String,
    },

    /// The payload failed validation; the store was not touched
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The store rejected the operation
    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    /// The backing database could not be opened
    #[error(transparent)]
    Open(#[from] StoreError),
}

impl ProviderError {
    pub(crate) fn unrecognized(uri: impl ToString) -> Self {
        ProviderError::UnrecognizedResource {
            uri: uri.to_string(),
        }
    }

    pub(crate) fn unsupported(operation: &'static str, uri: impl ToString) -> Self {
        ProviderError::UnsupportedOperation {
            operation,
            uri: uri.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        ProviderError::InvalidArgument(message.into())
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
