//! # Shim Errors
//!
//! Every failure an action can produce arrives through this one type,
//! whether it was raised while validating the descriptor, while resolving
//! it into a typed action, or by the document store underneath.
//!
//! Validation messages keep the exact wording of the legacy API so that
//! callers matching on message text keep working.

use thiserror::Error;

use crate::store::StoreError;

/// Result type for shim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by [`crate::DbClient::perform`] and descriptor resolution.
#[derive(Debug, Error)]
pub enum Error {
    // ==================
    // Descriptor validation
    // ==================
    /// The descriptor carries no `act` value.
    #[error("'act' undefined in params")]
    MissingAct,

    /// The action requires a `type` (collection name) and none was given.
    #[error("'type' undefined in params")]
    MissingType,

    /// Collection name exceeds the legacy length cap.
    #[error("'type' value '{name}' exceeds {max} characters")]
    TypeTooLong { name: String, max: usize },

    // ==================
    // Action resolution
    // ==================
    /// The `act` value names no supported action.
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    /// `fields` has the wrong shape for a create.
    #[error("fields must be a non-empty object or array of objects for '{act}' action")]
    InvalidFields { act: String },

    /// An update was requested without a replacement document.
    #[error("'fields' object required for 'update' action")]
    MissingFields,

    /// The action addresses a single document but no `guid` was given.
    #[error("'guid' is required for '{act}' action")]
    MissingGuid { act: String },

    /// An index action without an `index` specification.
    #[error("'index' object required for '{act}' action")]
    MissingIndex { act: String },

    // ==================
    // Query building
    // ==================
    /// A `geo` criterion that does not describe a centre/radius circle.
    #[error("invalid geo criteria for field '{field}': {reason}")]
    InvalidGeo { field: String, reason: String },

    // ==================
    // Store
    // ==================
    /// Pass-through failure from the document store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// True when the error was produced before any store interaction.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Error::Store(_))
    }
}
