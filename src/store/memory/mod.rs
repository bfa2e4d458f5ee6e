//! In-memory document store
//!
//! The reference backend: a process-local store implementing the full
//! capability seam. Collections spring into being on first write, documents
//! keep insertion order, and query evaluation matches the translated filter
//! dialect operator for operator. Tests run the whole shim against this
//! backend; embedded callers can use it as a throwaway store.

mod indexes;
mod matcher;
mod sorter;

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::id::{DocumentId, Oid};
use crate::query::Filter;
use crate::store::error::{StoreError, StoreResult};
use crate::store::traits::{DocumentCollection, DocumentStore, StoreConnector};
use crate::store::types::{Document, FindOptions, IndexKeys, InsertOutcome};

use indexes::IndexRegistry;

#[derive(Default)]
struct CollectionData {
    documents: Vec<Document>,
    indexes: IndexRegistry,
}

#[derive(Default)]
struct StoreInner {
    collections: RwLock<HashMap<String, CollectionData>>,
}

/// A shared handle to an in-memory document store.
///
/// Cloning is cheap and every clone addresses the same data, so a store can
/// be handed to a connector and inspected from the outside at once.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<StoreInner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Names of collections that currently exist.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collections.read().keys().cloned().collect()
    }

    /// Number of documents held by a collection (0 when it does not exist).
    pub fn document_count(&self, collection: &str) -> usize {
        self.inner
            .collections
            .read()
            .get(collection)
            .map_or(0, |data| data.documents.len())
    }

    /// Index names recorded for a collection, in creation order.
    pub fn index_names(&self, collection: &str) -> Vec<String> {
        self.inner
            .collections
            .read()
            .get(collection)
            .map_or_else(Vec::new, |data| data.indexes.names().to_vec())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn collection(&self, name: &str) -> StoreResult<Box<dyn DocumentCollection>> {
        if name.is_empty() {
            return Err(StoreError::InvalidCollectionName(name.to_string()));
        }
        Ok(Box::new(MemoryCollection {
            inner: Arc::clone(&self.inner),
            name: name.to_string(),
        }))
    }

    async fn close(&self) -> StoreResult<()> {
        // Nothing to release; data stays for other handles onto the store.
        debug!("memory store connection closed");
        Ok(())
    }
}

/// One collection of an in-memory store.
struct MemoryCollection {
    inner: Arc<StoreInner>,
    name: String,
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn insert_many(&self, documents: Vec<Document>) -> StoreResult<InsertOutcome> {
        let mut collections = self.inner.collections.write();
        let data = collections.entry(self.name.clone()).or_default();

        let mut accepted: Vec<Document> = Vec::with_capacity(documents.len());
        for mut document in documents {
            if !document.contains_key("_id") {
                document.insert(
                    "_id".to_string(),
                    DocumentId::Native(Oid::generate()).to_value(),
                );
            }
            let id = document.get("_id").cloned().unwrap_or_default();
            let taken = data
                .documents
                .iter()
                .chain(accepted.iter())
                .any(|existing| existing.get("_id") == Some(&id));
            if taken {
                return Err(StoreError::DuplicateKey {
                    id: crate::id::id_text(&id),
                });
            }
            accepted.push(document);
        }

        let inserted_count = accepted.len() as u64;
        data.documents.extend(accepted.iter().cloned());
        debug!(collection = %self.name, count = inserted_count, "documents inserted");
        Ok(InsertOutcome {
            inserted_count,
            documents: accepted,
        })
    }

    async fn find_one(
        &self,
        filter: &Filter,
        options: &FindOptions,
    ) -> StoreResult<Option<Document>> {
        let collections = self.inner.collections.read();
        let Some(data) = collections.get(&self.name) else {
            return Ok(None);
        };
        for document in &data.documents {
            if matcher::matches(document, filter)? {
                let found = match &options.projection {
                    Some(fields) => project(document, fields),
                    None => document.clone(),
                };
                return Ok(Some(found));
            }
        }
        Ok(None)
    }

    async fn find(&self, filter: &Filter, options: &FindOptions) -> StoreResult<Vec<Document>> {
        let mut results = {
            let collections = self.inner.collections.read();
            let Some(data) = collections.get(&self.name) else {
                return Ok(Vec::new());
            };
            let mut matched = Vec::new();
            for document in &data.documents {
                if matcher::matches(document, filter)? {
                    matched.push(document.clone());
                }
            }
            matched
        };

        if let Some(sort) = &options.sort {
            sorter::sort_documents(&mut results, sort);
        }
        if let Some(skip) = options.skip {
            let skip = (skip as usize).min(results.len());
            results.drain(..skip);
        }
        if let Some(limit) = options.limit {
            results.truncate(limit as usize);
        }
        if let Some(fields) = &options.projection {
            for document in &mut results {
                *document = project(document, fields);
            }
        }
        Ok(results)
    }

    async fn find_one_and_replace(
        &self,
        filter: &Filter,
        replacement: Document,
    ) -> StoreResult<Option<Document>> {
        let mut collections = self.inner.collections.write();
        let Some(data) = collections.get_mut(&self.name) else {
            return Ok(None);
        };
        let Some(position) = position_of_match(&data.documents, filter)? else {
            return Ok(None);
        };

        let previous = data.documents[position].clone();
        let mut replacement = replacement;
        match replacement.get("_id") {
            None => {
                if let Some(id) = previous.get("_id") {
                    replacement.insert("_id".to_string(), id.clone());
                }
            }
            Some(new_id) => {
                if previous.get("_id") != Some(new_id) {
                    return Err(StoreError::InvalidQuery(
                        "the immutable field '_id' cannot be changed by a replacement".to_string(),
                    ));
                }
            }
        }
        data.documents[position] = replacement;
        Ok(Some(previous))
    }

    async fn find_one_and_delete(&self, filter: &Filter) -> StoreResult<Option<Document>> {
        let mut collections = self.inner.collections.write();
        let Some(data) = collections.get_mut(&self.name) else {
            return Ok(None);
        };
        let Some(position) = position_of_match(&data.documents, filter)? else {
            return Ok(None);
        };
        Ok(Some(data.documents.remove(position)))
    }

    async fn delete_many(&self, filter: &Filter) -> StoreResult<u64> {
        let mut collections = self.inner.collections.write();
        let Some(data) = collections.get_mut(&self.name) else {
            return Ok(0);
        };
        if filter.is_empty() {
            let removed = data.documents.len() as u64;
            data.documents.clear();
            return Ok(removed);
        }

        // Evaluate first so a filter error leaves the collection untouched.
        let mut verdicts = Vec::with_capacity(data.documents.len());
        for document in &data.documents {
            verdicts.push(matcher::matches(document, filter)?);
        }
        let removed = verdicts.iter().filter(|hit| **hit).count() as u64;
        let mut verdicts = verdicts.into_iter();
        data.documents
            .retain(|_| !verdicts.next().unwrap_or(false));
        Ok(removed)
    }

    async fn create_index(&self, keys: IndexKeys) -> StoreResult<String> {
        let mut collections = self.inner.collections.write();
        let data = collections.entry(self.name.clone()).or_default();
        let name = data.indexes.create(keys)?;
        debug!(collection = %self.name, index = %name, "index recorded");
        Ok(name)
    }
}

fn position_of_match(documents: &[Document], filter: &Filter) -> StoreResult<Option<usize>> {
    for (position, document) in documents.iter().enumerate() {
        if matcher::matches(document, filter)? {
            return Ok(Some(position));
        }
    }
    Ok(None)
}

/// Keeps `_id` plus the named fields, preserving the document's own order.
fn project(document: &Document, fields: &[String]) -> Document {
    document
        .iter()
        .filter(|(key, _)| *key == "_id" || fields.iter().any(|field| field == *key))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// Connector producing handles onto one shared [`MemoryStore`].
///
/// Counts connection attempts so tests can observe whether a client reused
/// its connection or dialled again.
#[derive(Default)]
pub struct MemoryConnector {
    store: MemoryStore,
    attempts: AtomicUsize,
}

impl MemoryConnector {
    /// A connector over a fresh empty store.
    pub fn new() -> Self {
        MemoryConnector::default()
    }

    /// A connector over an existing store.
    pub fn with_store(store: MemoryStore) -> Self {
        MemoryConnector {
            store,
            attempts: AtomicUsize::new(0),
        }
    }

    /// The store this connector hands out.
    pub fn store(&self) -> MemoryStore {
        self.store.clone()
    }

    /// Number of `connect` calls made so far.
    pub fn connect_attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StoreConnector for MemoryConnector {
    async fn connect(&self, url: &str) -> StoreResult<Arc<dyn DocumentStore>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if url.is_empty() {
            return Err(StoreError::Connect("empty connection url".to_string()));
        }
        debug!(%url, "memory store connected");
        Ok(Arc::new(self.store.clone()))
    }
}
