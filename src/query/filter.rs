//! # Filter Documents
//!
//! A [`Filter`] is the store-dialect query document handed to collection
//! operations: field names mapped either to literal values (direct equality)
//! or to objects of `$`-tagged operator constraints.

use serde_json::{Map, Value};

use crate::id::DocumentId;
use crate::store::Document;

/// A composite query filter in the store's native dialect.
///
/// An empty filter matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter(Document);

impl Filter {
    /// A filter matching all documents.
    pub fn empty() -> Self {
        Filter(Document::new())
    }

    /// A filter addressing one document by its key.
    pub fn for_id(id: &DocumentId) -> Self {
        let mut doc = Document::new();
        doc.insert("_id".to_string(), id.to_value());
        Filter(doc)
    }

    /// Assigns a direct equality constraint, replacing anything already
    /// held for the field.
    pub fn set_literal(&mut self, field: &str, value: Value) {
        self.0.insert(field.to_string(), value);
    }

    /// Merges a `$`-tagged operator constraint into the field's constraint
    /// object, so several operators on one field narrow together.
    ///
    /// If the field currently holds a literal, the literal is replaced by a
    /// fresh constraint object.
    pub fn merge_operator(&mut self, field: &str, tag: &str, value: Value) {
        let slot = self
            .0
            .entry(field.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Some(constraints) = slot.as_object_mut() {
            constraints.insert(tag.to_string(), value);
        }
    }

    /// True when the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrowed view of the underlying filter document.
    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// Consumes the filter into its document.
    pub fn into_document(self) -> Document {
        self.0
    }
}

impl From<Document> for Filter {
    fn from(doc: Document) -> Self {
        Filter(doc)
    }
}
