//! # Identifier Codec
//!
//! Legacy callers address documents by `guid` strings. Most of those are
//! 24-hex renderings of native object identifiers, but the legacy API never
//! rejected anything else: an unparseable guid was quietly used verbatim as
//! the stored key. [`DocumentId`] makes that fallback explicit instead of
//! leaving it to a swallowed exception.

mod oid;

pub use oid::{Oid, ParseOidError, OID_HEX_LEN, OID_LEN};

use serde_json::{Map, Value};

/// JSON key wrapping a native identifier inside a stored document.
pub const OID_KEY: &str = "$oid";

/// A document key as the store understands it.
///
/// Decoding never fails: text that parses as 24 hex characters becomes a
/// [`DocumentId::Native`] identifier, anything else is kept verbatim as
/// [`DocumentId::Opaque`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DocumentId {
    /// A native 12-byte object identifier.
    Native(Oid),
    /// A caller-supplied key used as-is.
    Opaque(String),
}

impl DocumentId {
    /// Decodes guid text into a document key.
    pub fn decode(text: &str) -> Self {
        match Oid::parse_str(text) {
            Ok(oid) => DocumentId::Native(oid),
            Err(_) => DocumentId::Opaque(text.to_string()),
        }
    }

    /// The JSON value stored under `_id`.
    ///
    /// Native identifiers are wrapped as `{"$oid": "<hex>"}` so they stay
    /// distinguishable from plain strings; opaque keys stay plain strings.
    pub fn to_value(&self) -> Value {
        match self {
            DocumentId::Native(oid) => {
                let mut wrapper = Map::new();
                wrapper.insert(OID_KEY.to_string(), Value::String(oid.to_hex()));
                Value::Object(wrapper)
            }
            DocumentId::Opaque(text) => Value::String(text.clone()),
        }
    }

    /// Guid text for reply envelopes.
    pub fn text(&self) -> String {
        match self {
            DocumentId::Native(oid) => oid.to_hex(),
            DocumentId::Opaque(text) => text.clone(),
        }
    }

    /// Reads a document key back out of a stored `_id` value.
    pub fn from_value(value: &Value) -> Option<DocumentId> {
        match value {
            Value::String(text) => Some(DocumentId::Opaque(text.clone())),
            Value::Object(map) => {
                let hex = map.get(OID_KEY)?.as_str()?;
                Oid::parse_str(hex).ok().map(DocumentId::Native)
            }
            _ => None,
        }
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text())
    }
}

/// Guid text for an arbitrary stored `_id` value.
///
/// Unrecognised shapes (numbers, arrays) fall back to compact JSON, which
/// matches how the legacy API stringified whatever the driver returned.
pub fn id_text(value: &Value) -> String {
    match DocumentId::from_value(value) {
        Some(id) => id.text(),
        None => value.to_string(),
    }
}
