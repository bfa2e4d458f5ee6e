//! # Store Data Types
//!
//! The plain-data vocabulary shared by every backend: schemaless documents,
//! find options, insert outcomes, and index key specifications.

use serde_json::{Map, Number, Value};

use crate::store::error::{StoreError, StoreResult};

/// A schemaless document: a JSON object preserving field insertion order.
pub type Document = Map<String, Value>;

/// Options applied by `find`-family operations after filtering.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    /// Restrict returned fields to these names (`_id` always included).
    pub projection: Option<Vec<String>>,
    /// Number of matching documents to pass over.
    pub skip: Option<u64>,
    /// Cap on the number of documents returned.
    pub limit: Option<u64>,
    /// Sort specification: field name to direction, negative for
    /// descending. Applied before skip and limit.
    pub sort: Option<Document>,
}

impl FindOptions {
    /// Options carrying only a projection.
    pub fn projecting(fields: Option<Vec<String>>) -> Self {
        FindOptions {
            projection: fields,
            ..FindOptions::default()
        }
    }
}

/// Result of a bulk insert.
#[derive(Debug, Clone)]
pub struct InsertOutcome {
    /// Number of documents written.
    pub inserted_count: u64,
    /// The documents as stored, with generated `_id` values filled in.
    pub documents: Vec<Document>,
}

/// An index key specification: fields in declaration order, each mapped to
/// a direction code (`1`, `-1`) or the planar geo code (`"2d"`).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexKeys(Document);

impl IndexKeys {
    /// Translates a legacy index specification.
    ///
    /// Direction tokens are matched case-insensitively: `ASC` ascending,
    /// `DESC` descending, `2D` planar geo. Anything else falls back to
    /// ascending, as the legacy API did.
    pub fn from_spec(spec: &Document) -> Self {
        let mut keys = Document::new();
        for (field, token) in spec {
            keys.insert(field.clone(), direction_code(token));
        }
        IndexKeys(keys)
    }

    /// Derives the store's conventional index name: field and code pairs
    /// joined with underscores, e.g. `location_2d_name_1`.
    pub fn name(&self) -> String {
        let mut parts = Vec::with_capacity(self.0.len() * 2);
        for (field, code) in &self.0 {
            parts.push(field.clone());
            parts.push(match code {
                Value::String(tag) => tag.clone(),
                other => other.to_string(),
            });
        }
        parts.join("_")
    }

    /// Rejects key layouts the store would refuse: no keys at all, or a
    /// planar geo key anywhere but the leading position.
    pub fn validate(&self) -> StoreResult<()> {
        if self.0.is_empty() {
            return Err(StoreError::InvalidIndex(
                "index keys cannot be empty".to_string(),
            ));
        }
        for (position, (_, code)) in self.0.iter().enumerate() {
            if position > 0 && code.as_str() == Some("2d") {
                return Err(StoreError::InvalidIndex(
                    "2d has to be first in index".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Borrowed view of the key document.
    pub fn as_document(&self) -> &Document {
        &self.0
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for a specification with no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn direction_code(token: &Value) -> Value {
    let text = match token {
        Value::String(text) => text.to_uppercase(),
        other => other.to_string().to_uppercase(),
    };
    match text.as_str() {
        "DESC" => Value::Number(Number::from(-1)),
        "2D" => Value::String("2d".to_string()),
        // ASC and anything unrecognised index ascending.
        _ => Value::Number(Number::from(1)),
    }
}
