//! API surface of the shim
//!
//! The caller-facing vocabulary: loosely-typed action descriptors in, typed
//! actions through the middle, legacy-shaped replies out.
//!
//! # Supported actions
//!
//! - create
//! - read
//! - list
//! - update
//! - delete
//! - deleteall
//! - index

mod action;
mod request;
mod response;

pub use action::{
    Action, CreateParams, DeleteParams, IndexParams, ListParams, ReadParams, ResolvedAction,
    UpdateParams,
};
pub use request::{ActionDescriptor, MAX_COLLECTION_NAME};
pub use response::{ClearStatus, CreateStatus, Envelope, IndexStatus, ListReply, Reply};
