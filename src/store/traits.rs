//! # Store Capability Traits
//!
//! The seam between the shim and whatever document store sits underneath.
//! A [`StoreConnector`] dials a store by URL; a [`DocumentStore`] hands out
//! collections; a [`DocumentCollection`] carries the operations the seven
//! actions compile down to. Backends are trait objects so tests can run
//! against the in-memory store and production against a real driver without
//! changing the client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::query::Filter;
use crate::store::error::StoreResult;
use crate::store::types::{Document, FindOptions, IndexKeys, InsertOutcome};

/// Dials a document store.
#[async_trait]
pub trait StoreConnector: Send + Sync {
    /// Opens a connection to the store at `url`.
    async fn connect(&self, url: &str) -> StoreResult<Arc<dyn DocumentStore>>;
}

/// An open connection to a document store.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns a handle to the named collection.
    ///
    /// Collections spring into being on first write; asking for an unknown
    /// name is not an error, an unusable name is.
    fn collection(&self, name: &str) -> StoreResult<Box<dyn DocumentCollection>>;

    /// Closes the connection. Further use of collection handles obtained
    /// from this store is undefined.
    async fn close(&self) -> StoreResult<()>;
}

/// Operations on one collection of documents.
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Inserts documents, generating an `_id` for any that lack one.
    async fn insert_many(&self, documents: Vec<Document>) -> StoreResult<InsertOutcome>;

    /// Returns the first document matching `filter`, or `None`.
    async fn find_one(&self, filter: &Filter, options: &FindOptions)
        -> StoreResult<Option<Document>>;

    /// Returns every document matching `filter`, shaped by `options`
    /// (sort, then skip, then limit, then projection).
    async fn find(&self, filter: &Filter, options: &FindOptions) -> StoreResult<Vec<Document>>;

    /// Replaces the first document matching `filter` wholesale, keeping its
    /// `_id`. Returns the pre-image, or `None` when nothing matched.
    async fn find_one_and_replace(
        &self,
        filter: &Filter,
        replacement: Document,
    ) -> StoreResult<Option<Document>>;

    /// Removes the first document matching `filter` and returns it, or
    /// `None` when nothing matched.
    async fn find_one_and_delete(&self, filter: &Filter) -> StoreResult<Option<Document>>;

    /// Removes every document matching `filter`; an empty filter clears the
    /// collection. Returns the number removed.
    async fn delete_many(&self, filter: &Filter) -> StoreResult<u64>;

    /// Creates an index and returns its name. Creating an index that
    /// already exists returns the existing name.
    async fn create_index(&self, keys: IndexKeys) -> StoreResult<String>;
}

impl fmt::Debug for dyn DocumentCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The concrete backend is type-erased; there is nothing more
        // specific to show.
        f.write_str("dyn DocumentCollection")
    }
}
