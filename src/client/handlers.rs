//! # Action Handlers
//!
//! One handler per action, each translating its typed parameters into
//! collection operations and normalizing the outcome into a legacy reply.
//! Handlers never invent failures: anything the store accepts is formatted,
//! anything it rejects passes through as a store error.

use serde_json::Value;
use tracing::debug;

use crate::api::{
    ClearStatus, CreateParams, CreateStatus, DeleteParams, Envelope, IndexParams, IndexStatus,
    ListParams, ListReply, ReadParams, Reply, UpdateParams,
};
use crate::error::Result;
use crate::id::{DocumentId, Oid, OID_HEX_LEN};
use crate::query::{build_filter, Filter};
use crate::store::{Document, DocumentCollection, FindOptions, IndexKeys};

/// Inserts the documents; one document answers with its envelope, several
/// answer with a count notice.
pub(crate) async fn create(
    collection: &dyn DocumentCollection,
    doc_type: &str,
    params: CreateParams,
) -> Result<Reply> {
    let documents: Vec<Document> = params
        .documents
        .into_iter()
        .map(normalize_create_id)
        .collect();
    let outcome = collection.insert_many(documents).await?;
    debug!(
        collection = doc_type,
        count = outcome.inserted_count,
        "documents created"
    );
    if outcome.inserted_count == 1 {
        let stored = outcome.documents.into_iter().next();
        Ok(Reply::Doc(Envelope::from_document(stored, doc_type)))
    } else {
        Ok(Reply::Created(CreateStatus::new(outcome.inserted_count)))
    }
}

/// A caller-supplied `_id` of native hex width becomes a native identifier,
/// so creates and later reads by guid agree on the stored key. Any other
/// `_id` is stored exactly as given.
fn normalize_create_id(mut document: Document) -> Document {
    let native = match document.get("_id") {
        Some(Value::String(text)) if text.len() == OID_HEX_LEN => Oid::parse_str(text).ok(),
        _ => None,
    };
    if let Some(oid) = native {
        document.insert("_id".to_string(), DocumentId::Native(oid).to_value());
    }
    document
}

/// Fetches one document by guid. A read without a guid answers `{}` without
/// querying the store.
pub(crate) async fn read(
    collection: &dyn DocumentCollection,
    doc_type: &str,
    params: ReadParams,
) -> Result<Reply> {
    let Some(guid) = params.guid else {
        return Ok(Reply::empty());
    };
    let filter = Filter::for_id(&DocumentId::decode(&guid));
    let options = FindOptions::projecting(params.projection);
    let found = collection.find_one(&filter, &options).await?;
    Ok(Reply::Doc(Envelope::from_document(found, doc_type)))
}

/// Translates the criteria groups into a store filter and runs the query,
/// answering with a counted list of envelopes.
pub(crate) async fn list(
    collection: &dyn DocumentCollection,
    doc_type: &str,
    params: ListParams,
) -> Result<Reply> {
    let filter = build_filter(&params.criteria)?;
    let options = FindOptions {
        projection: params.projection,
        skip: params.skip,
        limit: params.limit,
        sort: params.sort,
    };
    let found = collection.find(&filter, &options).await?;
    debug!(collection = doc_type, count = found.len(), "list matched");
    let list = found
        .into_iter()
        .map(|document| Envelope::from_document(Some(document), doc_type))
        .collect();
    Ok(Reply::List(ListReply::new(list)))
}

/// Replaces the addressed document wholesale, then answers with a fresh
/// read of the key. Replacing a key that matches nothing is not an error;
/// the re-read simply answers `{}`.
pub(crate) async fn update(
    collection: &dyn DocumentCollection,
    doc_type: &str,
    params: UpdateParams,
) -> Result<Reply> {
    let filter = Filter::for_id(&DocumentId::decode(&params.guid));
    collection.find_one_and_replace(&filter, params.fields).await?;
    read(
        collection,
        doc_type,
        ReadParams {
            guid: Some(params.guid),
            projection: None,
        },
    )
    .await
}

/// Removes one document by guid and answers with its last stored state.
/// A delete without a guid answers `{}` without touching the store.
pub(crate) async fn delete(
    collection: &dyn DocumentCollection,
    doc_type: &str,
    params: DeleteParams,
) -> Result<Reply> {
    let Some(guid) = params.guid else {
        return Ok(Reply::empty());
    };
    let filter = Filter::for_id(&DocumentId::decode(&guid));
    let removed = collection.find_one_and_delete(&filter).await?;
    Ok(Reply::Doc(Envelope::from_document(removed, doc_type)))
}

/// Clears the collection and reports how many documents went.
pub(crate) async fn delete_all(collection: &dyn DocumentCollection) -> Result<Reply> {
    let removed = collection.delete_many(&Filter::empty()).await?;
    Ok(Reply::Cleared(ClearStatus::new(removed)))
}

/// Declares an index from the legacy specification and reports its name.
pub(crate) async fn index(
    collection: &dyn DocumentCollection,
    params: IndexParams,
) -> Result<Reply> {
    let keys = IndexKeys::from_spec(&params.spec);
    let name = collection.create_index(keys).await?;
    Ok(Reply::Indexed(IndexStatus::new(name)))
}
