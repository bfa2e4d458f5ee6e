//! # Reply Shapes
//!
//! The legacy reply shapes, reproduced key for key: the document envelope
//! (`type`/`guid`/`fields`), the list reply (`count`/`list`), and the three
//! status notices with their historical key casing (`Status`/`Count` for
//! bulk creates, lowercase for clears, `indexName` for index creation).
//! Callers parsing replies by key must keep working unchanged.

use serde::Serialize;
use serde_json::Value;

use crate::id;
use crate::store::Document;

/// A single document rendered in the legacy envelope shape.
///
/// `type` and `guid` appear only when the source document carried an `_id`;
/// `fields` appears only when the document had anything besides `_id`. A
/// miss renders as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Envelope {
    /// Collection name.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    /// Document key, as guid text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guid: Option<String>,
    /// Every stored field except `_id`, in stored order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Document>,
}

impl Envelope {
    /// The empty envelope, rendered as `{}`.
    pub fn empty() -> Self {
        Envelope::default()
    }

    /// True when this renders as `{}`.
    pub fn is_empty(&self) -> bool {
        self.doc_type.is_none() && self.guid.is_none() && self.fields.is_none()
    }

    /// Normalizes a store document into the envelope shape.
    pub fn from_document(document: Option<Document>, doc_type: &str) -> Self {
        let Some(document) = document else {
            return Envelope::empty();
        };
        let mut envelope = Envelope::empty();
        if let Some(id_value) = document.get("_id") {
            envelope.doc_type = Some(doc_type.to_string());
            envelope.guid = Some(id::id_text(id_value));
        }
        let fields: Document = document
            .iter()
            .filter(|(key, _)| *key != "_id")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if !fields.is_empty() {
            envelope.fields = Some(fields);
        }
        envelope
    }
}

/// Reply to a list action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListReply {
    /// Number of documents returned (after paging).
    pub count: usize,
    /// The matching documents as envelopes.
    pub list: Vec<Envelope>,
}

impl ListReply {
    /// Builds a list reply from normalized envelopes.
    pub fn new(list: Vec<Envelope>) -> Self {
        ListReply {
            count: list.len(),
            list,
        }
    }
}

/// Status notice for a multi-document create.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateStatus {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Count")]
    pub count: u64,
}

impl CreateStatus {
    pub fn new(count: u64) -> Self {
        CreateStatus {
            status: "OK".to_string(),
            count,
        }
    }
}

/// Status notice for a deleteall.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClearStatus {
    pub status: String,
    pub count: u64,
}

impl ClearStatus {
    pub fn new(count: u64) -> Self {
        ClearStatus {
            status: "ok".to_string(),
            count,
        }
    }
}

/// Status notice for index creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexStatus {
    pub status: String,
    #[serde(rename = "indexName")]
    pub index_name: String,
}

impl IndexStatus {
    pub fn new(index_name: String) -> Self {
        IndexStatus {
            status: "OK".to_string(),
            index_name,
        }
    }
}

/// Any reply an action can produce. Serializes as the bare legacy shape,
/// with no tagging added.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// A single document (create of one, read, update, delete).
    Doc(Envelope),
    /// A list result.
    List(ListReply),
    /// A bulk create acknowledgement.
    Created(CreateStatus),
    /// A deleteall acknowledgement.
    Cleared(ClearStatus),
    /// An index creation acknowledgement.
    Indexed(IndexStatus),
}

impl Reply {
    /// The empty reply `{}`.
    pub fn empty() -> Self {
        Reply::Doc(Envelope::empty())
    }

    /// The envelope, when this reply is a single document.
    pub fn as_envelope(&self) -> Option<&Envelope> {
        match self {
            Reply::Doc(envelope) => Some(envelope),
            _ => None,
        }
    }

    /// The list reply, when this is one.
    pub fn as_list(&self) -> Option<&ListReply> {
        match self {
            Reply::List(list) => Some(list),
            _ => None,
        }
    }

    /// Renders the reply as its legacy JSON value.
    pub fn to_value(&self) -> Value {
        serde_json::to_value(self).expect("reply serialization cannot fail")
    }

    /// Renders the reply as a JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("reply serialization cannot fail")
    }
}
