//! # Index Registry
//!
//! Book-keeping for indexes declared on an in-memory collection. The
//! reference backend never consults indexes to answer queries (scans are
//! exact already); it records them so index creation behaves observably
//! like a real store: validation, conventional names, idempotent creation.

use crate::store::error::StoreResult;
use crate::store::types::IndexKeys;

/// Indexes declared on one collection, by derived name in creation order.
#[derive(Debug, Default)]
pub struct IndexRegistry {
    names: Vec<String>,
}

impl IndexRegistry {
    /// Validates and records an index, returning its derived name.
    ///
    /// Re-creating an index with the same keys is a no-op returning the
    /// existing name.
    pub fn create(&mut self, keys: IndexKeys) -> StoreResult<String> {
        keys.validate()?;
        let name = keys.name();
        if !self.names.contains(&name) {
            self.names.push(name.clone());
        }
        Ok(name)
    }

    /// Names of all recorded indexes, in creation order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of recorded indexes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when no index has been declared.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
