//! Document store subsystem
//!
//! Backend-facing half of the shim: the capability traits a store must
//! provide, the plain-data types flowing across that seam, and the
//! in-memory reference backend used by tests and embedded callers.

mod error;
pub mod memory;
mod traits;
mod types;

pub use error::{StoreError, StoreResult};
pub use traits::{DocumentCollection, DocumentStore, StoreConnector};
pub use types::{Document, FindOptions, IndexKeys, InsertOutcome};
