//! # Operator Groups
//!
//! The legacy request shape for list criteria: one optional map per
//! operator, each keyed by field name. `like` arguments are regex patterns
//! (plain string, or `{pattern, options}`), `in` arguments are candidate
//! arrays, and `geo` arguments are [`GeoCircle`] objects.

use serde::Deserialize;
use serde_json::Value;

use crate::store::Document;

/// Criteria groups carried by a list action descriptor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperatorGroups {
    /// Direct equality per field.
    pub eq: Option<Document>,
    /// Not-equal per field.
    pub ne: Option<Document>,
    /// Strictly-less-than per field.
    pub lt: Option<Document>,
    /// Less-than-or-equal per field.
    pub le: Option<Document>,
    /// Strictly-greater-than per field.
    pub gt: Option<Document>,
    /// Greater-than-or-equal per field.
    pub ge: Option<Document>,
    /// Regex match per field.
    pub like: Option<Document>,
    /// Membership in a candidate array per field.
    pub r#in: Option<Document>,
    /// Geospatial circle containment per field.
    pub geo: Option<Document>,
}

impl OperatorGroups {
    /// True when no group carries any criteria.
    pub fn is_empty(&self) -> bool {
        fn blank(group: &Option<Document>) -> bool {
            group.as_ref().map_or(true, |fields| fields.is_empty())
        }
        blank(&self.eq)
            && blank(&self.ne)
            && blank(&self.lt)
            && blank(&self.le)
            && blank(&self.gt)
            && blank(&self.ge)
            && blank(&self.like)
            && blank(&self.r#in)
            && blank(&self.geo)
    }
}

/// A circle on the Earth's surface, as given in a `geo` criterion.
///
/// `center` is a `[longitude, latitude]` pair in degrees; `radius` is in
/// kilometres.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoCircle {
    pub center: [f64; 2],
    pub radius: f64,
}

impl GeoCircle {
    /// Parses one `geo` group argument.
    pub fn from_value(value: &Value) -> Result<Self, String> {
        serde_json::from_value(value.clone()).map_err(|err| err.to_string())
    }
}
