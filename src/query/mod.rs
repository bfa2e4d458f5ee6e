//! Query translation subsystem
//!
//! Legacy list requests carry criteria in named operator groups (`eq`, `ne`,
//! `lt`, `le`, `gt`, `ge`, `like`, `in`, `geo`), each mapping field names to
//! arguments. This subsystem folds those groups into a single filter
//! document in the store's native `$`-operator dialect.
//!
//! # Translation order (fixed)
//!
//! 1. `eq` assigns direct equality values
//! 2. `ne`/`lt`/`le`/`gt`/`ge` merge `$ne`/`$lt`/`$lte`/`$gt`/`$gte`
//! 3. `like` merges `$regex` (with `$options` when given)
//! 4. `in` merges `$in`
//! 5. `geo` merges `$within`/`$centerSphere`, converting km to radians

mod builder;
mod filter;
mod operators;

pub use builder::{build_filter, EARTH_RADIUS_KM};
pub use filter::Filter;
pub use operators::{GeoCircle, OperatorGroups};
