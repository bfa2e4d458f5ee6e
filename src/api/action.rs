//! # Typed Actions
//!
//! Resolution from a loosely-typed descriptor into one of the seven
//! supported actions, each carrying exactly the parameters it reads.
//! The dispatcher downstream matches on the closed enum, so an action
//! name outside the seven is unrepresentable past this point.

use serde_json::Value;

use crate::api::request::ActionDescriptor;
use crate::error::{Error, Result};
use crate::query::OperatorGroups;
use crate::store::Document;

/// A validated action bound to its collection.
#[derive(Debug, Clone)]
pub struct ResolvedAction {
    /// Collection the action addresses. Empty only for a typeless list,
    /// which the store then rejects by name.
    pub collection: String,
    /// The action and its parameters.
    pub action: Action,
}

/// The seven actions the shim performs.
#[derive(Debug, Clone)]
pub enum Action {
    /// Insert one or more documents.
    Create(CreateParams),
    /// Fetch a single document by key.
    Read(ReadParams),
    /// Query documents by criteria.
    List(ListParams),
    /// Replace a single document wholesale.
    Update(UpdateParams),
    /// Remove a single document by key.
    Delete(DeleteParams),
    /// Clear the collection.
    DeleteAll,
    /// Declare an index.
    Index(IndexParams),
}

impl Action {
    /// The legacy action name, for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::Create(_) => "create",
            Action::Read(_) => "read",
            Action::List(_) => "list",
            Action::Update(_) => "update",
            Action::Delete(_) => "delete",
            Action::DeleteAll => "deleteall",
            Action::Index(_) => "index",
        }
    }
}

/// Parameters for a create action.
#[derive(Debug, Clone)]
pub struct CreateParams {
    /// Documents to insert, in the order given.
    pub documents: Vec<Document>,
}

/// Parameters for a read action.
#[derive(Debug, Clone, Default)]
pub struct ReadParams {
    /// Document key; a read without one short-circuits to an empty reply.
    pub guid: Option<String>,
    /// Field names to return, when `fields` was a list.
    pub projection: Option<Vec<String>>,
}

/// Parameters for a list action.
#[derive(Debug, Clone, Default)]
pub struct ListParams {
    /// Criteria operator groups to translate into a store filter.
    pub criteria: OperatorGroups,
    /// Field names to return, when `fields` was a list.
    pub projection: Option<Vec<String>>,
    /// Matching documents to pass over. Negative values were dropped.
    pub skip: Option<u64>,
    /// Cap on returned documents. Zero and negative values were dropped.
    pub limit: Option<u64>,
    /// Sort specification passed through to the store.
    pub sort: Option<Document>,
}

/// Parameters for an update action.
#[derive(Debug, Clone)]
pub struct UpdateParams {
    /// Key of the document to replace.
    pub guid: String,
    /// The full replacement document.
    pub fields: Document,
}

/// Parameters for a delete action.
#[derive(Debug, Clone, Default)]
pub struct DeleteParams {
    /// Document key; a delete without one short-circuits to an empty reply.
    pub guid: Option<String>,
}

/// Parameters for an index action.
#[derive(Debug, Clone)]
pub struct IndexParams {
    /// Legacy index specification, field name to `ASC`/`DESC`/`2D`.
    pub spec: Document,
}

impl ActionDescriptor {
    /// Validates the descriptor and resolves it into a typed action.
    ///
    /// Consumes the descriptor; parameter values move into the action.
    pub fn resolve(self) -> Result<ResolvedAction> {
        self.validate()?;
        let act = self.act.clone().unwrap_or_default();
        let collection = self.doc_type.clone().unwrap_or_default();

        let action = match act.as_str() {
            "create" => resolve_create(self)?,
            "read" => Action::Read(ReadParams {
                guid: clean_guid(self.guid),
                projection: projection_list(self.fields),
            }),
            "list" => Action::List(ListParams {
                projection: projection_list(self.fields),
                skip: self.skip.filter(|skip| *skip >= 0).map(|skip| skip as u64),
                limit: self.limit.filter(|limit| *limit > 0).map(|limit| limit as u64),
                sort: self.sort,
                criteria: self.criteria,
            }),
            "update" => resolve_update(self)?,
            "delete" => Action::Delete(DeleteParams {
                guid: clean_guid(self.guid),
            }),
            "deleteall" => Action::DeleteAll,
            "index" => resolve_index(self)?,
            other => return Err(Error::UnknownAction(other.to_string())),
        };

        Ok(ResolvedAction { collection, action })
    }
}

fn resolve_create(descriptor: ActionDescriptor) -> Result<Action> {
    let invalid = || Error::InvalidFields {
        act: "create".to_string(),
    };
    let documents = match descriptor.fields {
        Some(Value::Object(document)) if !document.is_empty() => vec![document],
        Some(Value::Array(items)) if !items.is_empty() => {
            let mut documents = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::Object(document) => documents.push(document),
                    _ => return Err(invalid()),
                }
            }
            documents
        }
        _ => return Err(invalid()),
    };
    Ok(Action::Create(CreateParams { documents }))
}

fn resolve_update(descriptor: ActionDescriptor) -> Result<Action> {
    // The replacement document is checked before the guid, keeping the
    // legacy error precedence.
    let fields = match descriptor.fields {
        Some(Value::Object(document)) => document,
        _ => return Err(Error::MissingFields),
    };
    let guid = clean_guid(descriptor.guid).ok_or(Error::MissingGuid {
        act: "update".to_string(),
    })?;
    Ok(Action::Update(UpdateParams { guid, fields }))
}

fn resolve_index(descriptor: ActionDescriptor) -> Result<Action> {
    let spec = descriptor.index.ok_or(Error::MissingIndex {
        act: "index".to_string(),
    })?;
    Ok(Action::Index(IndexParams { spec }))
}

/// The legacy API treated an empty guid as absent.
fn clean_guid(guid: Option<String>) -> Option<String> {
    guid.filter(|guid| !guid.is_empty())
}

/// A `fields` list on read/list is a projection; string entries name the
/// fields to keep. Any other `fields` shape means no projection.
fn projection_list(fields: Option<Value>) -> Option<Vec<String>> {
    match fields {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(name) => Some(name),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn descriptor(value: serde_json::Value) -> ActionDescriptor {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_resolve_create_single_object() {
        let resolved = descriptor(json!({
            "act": "create",
            "type": "users",
            "fields": { "name": "ada" }
        }))
        .resolve()
        .unwrap();
        assert_eq!(resolved.collection, "users");
        match resolved.action {
            Action::Create(params) => {
                assert_eq!(params.documents.len(), 1);
                assert_eq!(params.documents[0].get("name"), Some(&json!("ada")));
            }
            other => panic!("expected Create, got {}", other.name()),
        }
    }

    #[test]
    fn test_resolve_create_array() {
        let resolved = descriptor(json!({
            "act": "create",
            "type": "users",
            "fields": [{ "n": 1 }, { "n": 2 }, { "n": 3 }]
        }))
        .resolve()
        .unwrap();
        match resolved.action {
            Action::Create(params) => assert_eq!(params.documents.len(), 3),
            other => panic!("expected Create, got {}", other.name()),
        }
    }

    #[test]
    fn test_resolve_create_rejects_wrong_shapes() {
        for fields in [
            json!(null),
            json!("text"),
            json!(7),
            json!({}),
            json!([]),
            json!([{ "ok": 1 }, "not a document"]),
        ] {
            let result = descriptor(json!({
                "act": "create",
                "type": "users",
                "fields": fields
            }))
            .resolve();
            assert!(matches!(result, Err(Error::InvalidFields { .. })));
        }

        // Missing fields entirely is the same failure.
        let result = descriptor(json!({ "act": "create", "type": "users" })).resolve();
        assert!(matches!(result, Err(Error::InvalidFields { .. })));
    }

    #[test]
    fn test_resolve_read_with_projection() {
        let resolved = descriptor(json!({
            "act": "read",
            "type": "users",
            "guid": "abc",
            "fields": ["name", "age"]
        }))
        .resolve()
        .unwrap();
        match resolved.action {
            Action::Read(params) => {
                assert_eq!(params.guid.as_deref(), Some("abc"));
                assert_eq!(
                    params.projection,
                    Some(vec!["name".to_string(), "age".to_string()])
                );
            }
            other => panic!("expected Read, got {}", other.name()),
        }
    }

    #[test]
    fn test_resolve_read_without_guid() {
        let resolved = descriptor(json!({ "act": "read", "type": "users", "guid": "" }))
            .resolve()
            .unwrap();
        match resolved.action {
            Action::Read(params) => assert_eq!(params.guid, None),
            other => panic!("expected Read, got {}", other.name()),
        }
    }

    #[test]
    fn test_resolve_list_normalizes_paging() {
        let resolved = descriptor(json!({
            "act": "list",
            "type": "users",
            "skip": -3,
            "limit": 0
        }))
        .resolve()
        .unwrap();
        match resolved.action {
            Action::List(params) => {
                assert_eq!(params.skip, None);
                assert_eq!(params.limit, None);
            }
            other => panic!("expected List, got {}", other.name()),
        }

        let resolved = descriptor(json!({
            "act": "list",
            "type": "users",
            "skip": 0,
            "limit": 25
        }))
        .resolve()
        .unwrap();
        match resolved.action {
            Action::List(params) => {
                assert_eq!(params.skip, Some(0));
                assert_eq!(params.limit, Some(25));
            }
            other => panic!("expected List, got {}", other.name()),
        }
    }

    #[test]
    fn test_resolve_list_without_type() {
        // Valid at this layer; the store rejects the empty collection name.
        let resolved = descriptor(json!({ "act": "list" })).resolve().unwrap();
        assert_eq!(resolved.collection, "");
    }

    #[test]
    fn test_resolve_update_error_precedence() {
        let result = descriptor(json!({
            "act": "update",
            "type": "users",
            "guid": "abc"
        }))
        .resolve();
        assert!(matches!(result, Err(Error::MissingFields)));

        let result = descriptor(json!({
            "act": "update",
            "type": "users",
            "fields": { "a": 1 }
        }))
        .resolve();
        assert!(matches!(result, Err(Error::MissingGuid { .. })));

        // A non-object replacement is missing fields, not invalid fields.
        let result = descriptor(json!({
            "act": "update",
            "type": "users",
            "guid": "abc",
            "fields": [1, 2]
        }))
        .resolve();
        assert!(matches!(result, Err(Error::MissingFields)));
    }

    #[test]
    fn test_resolve_index_requires_spec() {
        let result = descriptor(json!({ "act": "index", "type": "users" })).resolve();
        assert!(matches!(result, Err(Error::MissingIndex { .. })));

        let resolved = descriptor(json!({
            "act": "index",
            "type": "users",
            "index": { "age": "DESC" }
        }))
        .resolve()
        .unwrap();
        match resolved.action {
            Action::Index(params) => assert_eq!(params.spec.len(), 1),
            other => panic!("expected Index, got {}", other.name()),
        }
    }

    #[test]
    fn test_resolve_unknown_action() {
        let err = descriptor(json!({ "act": "export", "type": "users" }))
            .resolve()
            .unwrap_err();
        match err {
            Error::UnknownAction(name) => assert_eq!(name, "export"),
            other => panic!("expected UnknownAction, got {other:?}"),
        }
    }

    #[test]
    fn test_close_validates_but_does_not_resolve() {
        // `close` sat on the legacy typeless allow-list yet never had a
        // handler; resolution is where that surfaces.
        let d = ActionDescriptor::new("close");
        assert!(d.validate().is_ok());
        assert!(matches!(d.resolve(), Err(Error::UnknownAction(_))));
    }

    #[test]
    fn test_resolve_deleteall() {
        let resolved = descriptor(json!({ "act": "deleteall", "type": "users" }))
            .resolve()
            .unwrap();
        assert!(matches!(resolved.action, Action::DeleteAll));
    }
}
