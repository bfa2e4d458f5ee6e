//! shimdb - A compatibility shim for a legacy document-database API
//!
//! Translates legacy action descriptors (`create`, `read`, `update`,
//! `delete`, `deleteall`, `list`, `index`) into operations against a
//! schemaless document store, and shapes store results back into the
//! reply envelopes the legacy callers expect.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod id;
pub mod query;
pub mod store;

pub use api::{Action, ActionDescriptor, Envelope, ListReply, Reply};
pub use client::DbClient;
pub use config::DbConfig;
pub use error::{Error, Result};
pub use id::{DocumentId, Oid};
pub use query::Filter;
pub use store::memory::{MemoryConnector, MemoryStore};
pub use store::{Document, DocumentCollection, DocumentStore, StoreConnector, StoreError};
