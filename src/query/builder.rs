//! # Filter Builder
//!
//! Folds legacy operator groups into one [`Filter`] document. Groups are
//! visited in a fixed order so the same descriptor always produces the same
//! filter. Building is pure; the only failure is a malformed `geo`
//! criterion.

use serde_json::{json, Value};

use crate::error::Error;
use crate::query::filter::Filter;
use crate::query::operators::{GeoCircle, OperatorGroups};

/// Mean Earth radius in kilometres, used to convert `geo` radii from
/// kilometres into the radians the store's `$centerSphere` expects.
pub const EARTH_RADIUS_KM: f64 = 6378.0;

/// Builds the store filter for a list action.
///
/// Criteria on distinct fields AND together; several operators on one field
/// narrow into a single constraint object. An equality criterion always
/// assigns the field directly, so a later operator on the same field starts
/// a fresh constraint object in place of the literal.
pub fn build_filter(groups: &OperatorGroups) -> Result<Filter, Error> {
    let mut filter = Filter::empty();

    if let Some(fields) = &groups.eq {
        for (field, value) in fields {
            filter.set_literal(field, value.clone());
        }
    }

    // Range and inequality groups, in their legacy visit order.
    let tagged = [
        (&groups.ne, "$ne"),
        (&groups.lt, "$lt"),
        (&groups.le, "$lte"),
        (&groups.gt, "$gt"),
        (&groups.ge, "$gte"),
    ];
    for (group, tag) in tagged {
        if let Some(fields) = group {
            for (field, value) in fields {
                filter.merge_operator(field, tag, value.clone());
            }
        }
    }

    if let Some(fields) = &groups.like {
        for (field, value) in fields {
            merge_like(&mut filter, field, value);
        }
    }

    if let Some(fields) = &groups.r#in {
        for (field, value) in fields {
            filter.merge_operator(field, "$in", value.clone());
        }
    }

    if let Some(fields) = &groups.geo {
        for (field, value) in fields {
            let circle = GeoCircle::from_value(value).map_err(|reason| Error::InvalidGeo {
                field: field.clone(),
                reason,
            })?;
            let radians = circle.radius / EARTH_RADIUS_KM;
            filter.merge_operator(
                field,
                "$within",
                json!({ "$centerSphere": [circle.center, radians] }),
            );
        }
    }

    Ok(filter)
}

/// A `like` argument is a regex pattern: either a plain string, or an
/// object `{pattern, options}` where options are regex flags (`i` for
/// case-insensitive).
fn merge_like(filter: &mut Filter, field: &str, value: &Value) {
    match value {
        Value::Object(spec) => {
            if let Some(pattern) = spec.get("pattern") {
                filter.merge_operator(field, "$regex", pattern.clone());
            }
            if let Some(options) = spec.get("options") {
                filter.merge_operator(field, "$options", options.clone());
            }
        }
        other => filter.merge_operator(field, "$regex", other.clone()),
    }
}
