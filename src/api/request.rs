//! # Action Descriptors
//!
//! The legacy request shape: one loosely-typed params object per call,
//! carrying the action name, the collection, and whichever parameters that
//! action reads. Everything is optional at this level; validation and
//! per-action extraction happen in resolution.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::query::OperatorGroups;
use crate::store::Document;

/// Longest collection name the legacy API accepted.
pub const MAX_COLLECTION_NAME: usize = 70;

/// Actions the legacy API allowed to omit `type`.
const TYPELESS_ACTIONS: [&str; 4] = ["close", "list", "export", "import"];

/// A legacy action request, as deserialized from a caller's params object.
///
/// Unknown keys are ignored, as the legacy API ignored them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActionDescriptor {
    /// Action name: one of `create`, `read`, `list`, `update`, `delete`,
    /// `deleteall`, `index`.
    pub act: Option<String>,
    /// Collection name.
    #[serde(rename = "type")]
    pub doc_type: Option<String>,
    /// Document key for single-document actions.
    pub guid: Option<String>,
    /// Create payload, update replacement, or read/list projection,
    /// depending on the action.
    pub fields: Option<Value>,
    /// List paging: matching documents to pass over.
    pub skip: Option<i64>,
    /// List paging: cap on returned documents.
    pub limit: Option<i64>,
    /// List sort specification, field name to direction.
    pub sort: Option<Document>,
    /// Index key specification for the index action.
    pub index: Option<Document>,
    /// List criteria operator groups (`eq`, `ne`, `lt`, ...).
    #[serde(flatten)]
    pub criteria: OperatorGroups,
}

impl ActionDescriptor {
    /// Starts a descriptor for the named action.
    pub fn new(act: &str) -> Self {
        ActionDescriptor {
            act: Some(act.to_string()),
            ..ActionDescriptor::default()
        }
    }

    /// Sets the collection name.
    pub fn with_type(mut self, doc_type: &str) -> Self {
        self.doc_type = Some(doc_type.to_string());
        self
    }

    /// Sets the document key.
    pub fn with_guid(mut self, guid: &str) -> Self {
        self.guid = Some(guid.to_string());
        self
    }

    /// Sets the fields value.
    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Sets the skip count.
    pub fn with_skip(mut self, skip: i64) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sets the limit.
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Sets the sort specification.
    pub fn with_sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the index key specification.
    pub fn with_index(mut self, index: Document) -> Self {
        self.index = Some(index);
        self
    }

    /// Sets the list criteria.
    pub fn with_criteria(mut self, criteria: OperatorGroups) -> Self {
        self.criteria = criteria;
        self
    }

    /// Checks the invariants every action shares.
    ///
    /// `act` must be present and non-empty; `type` likewise unless the
    /// action is on the legacy typeless allow-list; a present `type` must
    /// fit the legacy length cap. Checked in that order.
    pub fn validate(&self) -> Result<()> {
        let act = self
            .act
            .as_deref()
            .filter(|act| !act.is_empty())
            .ok_or(Error::MissingAct)?;

        let doc_type = self.doc_type.as_deref().filter(|name| !name.is_empty());
        if doc_type.is_none() && !TYPELESS_ACTIONS.contains(&act) {
            return Err(Error::MissingType);
        }
        if let Some(name) = doc_type {
            if name.chars().count() > MAX_COLLECTION_NAME {
                return Err(Error::TypeTooLong {
                    name: name.to_string(),
                    max: MAX_COLLECTION_NAME,
                });
            }
        }
        Ok(())
    }
}
