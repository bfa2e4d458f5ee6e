//! # Store Errors
//!
//! Failures raised by document store backends. These pass through the shim
//! unchanged so callers see the store's own wording, exactly as the legacy
//! API surfaced driver errors.

use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors produced by a document store backend.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The collection name is unusable (empty, for instance).
    #[error("invalid collection name: '{0}'")]
    InvalidCollectionName(String),

    /// An insert collided with an existing document key.
    #[error("duplicate key: a document with _id '{id}' already exists")]
    DuplicateKey { id: String },

    /// An index specification the store refuses, in the store's own words.
    #[error("{0}")]
    InvalidIndex(String),

    /// A filter document the store cannot evaluate.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Connecting to the store failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Transport or storage failure during an operation.
    #[error("store i/o error: {0}")]
    Io(String),
}
