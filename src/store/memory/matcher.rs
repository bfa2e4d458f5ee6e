//! # Filter Matching
//!
//! Evaluates filter documents against stored documents. No type coercion:
//! equality is exact, ranges compare numbers with numbers and strings with
//! strings, everything else fails to match.

use regex::RegexBuilder;
use serde_json::Value;

use crate::id::OID_KEY;
use crate::query::Filter;
use crate::store::error::{StoreError, StoreResult};
use crate::store::types::Document;

/// Checks whether a document satisfies every field constraint in a filter
/// (AND semantics).
pub fn matches(document: &Document, filter: &Filter) -> StoreResult<bool> {
    for (field, constraint) in filter.as_document() {
        if !field_matches(document.get(field), constraint)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn field_matches(actual: Option<&Value>, constraint: &Value) -> StoreResult<bool> {
    match constraint {
        Value::Object(expression) if is_operator_expression(expression) => {
            let options = expression.get("$options");
            for (tag, argument) in expression {
                let hit = match tag.as_str() {
                    "$ne" => actual != Some(argument),
                    "$lt" => ordered_match(actual, argument, |a, b| a < b, |a, b| a < b),
                    "$lte" => ordered_match(actual, argument, |a, b| a <= b, |a, b| a <= b),
                    "$gt" => ordered_match(actual, argument, |a, b| a > b, |a, b| a > b),
                    "$gte" => ordered_match(actual, argument, |a, b| a >= b, |a, b| a >= b),
                    "$in" => in_match(actual, argument)?,
                    "$regex" => regex_match(actual, argument, options)?,
                    // Consumed alongside $regex.
                    "$options" => true,
                    "$within" => within_match(actual, argument)?,
                    other => {
                        return Err(StoreError::InvalidQuery(format!(
                            "unrecognized operator '{other}'"
                        )))
                    }
                };
                if !hit {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        literal => Ok(actual == Some(literal)),
    }
}

/// A constraint object whose first key is a `$` tag is an operator
/// expression. The `$oid` identifier wrapper is the exception: it is a
/// stored value shape, so it is matched literally.
fn is_operator_expression(expression: &Document) -> bool {
    expression
        .keys()
        .next()
        .map_or(false, |key| key.starts_with('$') && key != OID_KEY)
}

/// Range comparison: numbers against numbers via f64, strings against
/// strings lexicographically. Missing fields and mixed types never match.
fn ordered_match(
    actual: Option<&Value>,
    bound: &Value,
    num_cmp: fn(f64, f64) -> bool,
    str_cmp: fn(&str, &str) -> bool,
) -> bool {
    match (actual, bound) {
        (Some(Value::Number(a)), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
            (Some(af), Some(bf)) => num_cmp(af, bf),
            _ => false,
        },
        (Some(Value::String(a)), Value::String(b)) => str_cmp(a, b),
        _ => false,
    }
}

fn in_match(actual: Option<&Value>, candidates: &Value) -> StoreResult<bool> {
    let candidates = candidates
        .as_array()
        .ok_or_else(|| StoreError::InvalidQuery("$in requires an array argument".to_string()))?;
    Ok(actual.map_or(false, |value| candidates.contains(value)))
}

fn regex_match(
    actual: Option<&Value>,
    pattern: &Value,
    options: Option<&Value>,
) -> StoreResult<bool> {
    let pattern = pattern
        .as_str()
        .ok_or_else(|| StoreError::InvalidQuery("$regex requires a string pattern".to_string()))?;
    let case_insensitive = options
        .and_then(Value::as_str)
        .map_or(false, |flags| flags.contains('i'));
    let regex = RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|err| StoreError::InvalidQuery(format!("invalid $regex pattern: {err}")))?;
    Ok(actual
        .and_then(Value::as_str)
        .map_or(false, |text| regex.is_match(text)))
}

/// `$within` with a `$centerSphere` argument: `[[lng, lat], radius]` where
/// the radius is in radians of central angle. Matches documents whose field
/// is a `[lng, lat]` pair inside the circle.
fn within_match(actual: Option<&Value>, argument: &Value) -> StoreResult<bool> {
    let sphere = argument
        .as_object()
        .and_then(|spec| spec.get("$centerSphere"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            StoreError::InvalidQuery("$within requires a $centerSphere argument".to_string())
        })?;
    let (center, radius) = match sphere.as_slice() {
        [center, radius] => (coordinate_pair(center), radius.as_f64()),
        _ => (None, None),
    };
    let (Some(center), Some(radius)) = (center, radius) else {
        return Err(StoreError::InvalidQuery(
            "malformed $centerSphere: expected [[lng, lat], radians]".to_string(),
        ));
    };
    let Some(point) = actual.and_then(coordinate_pair) else {
        return Ok(false);
    };
    Ok(central_angle(point, center) <= radius)
}

fn coordinate_pair(value: &Value) -> Option<(f64, f64)> {
    let pair = value.as_array()?;
    match pair.as_slice() {
        [x, y] => Some((x.as_f64()?, y.as_f64()?)),
        _ => None,
    }
}

/// Central angle in radians between two `(lng, lat)` points given in
/// degrees, by the haversine formula.
fn central_angle(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lng_a, lat_a) = (a.0.to_radians(), a.1.to_radians());
    let (lng_b, lat_b) = (b.0.to_radians(), b.1.to_radians());
    let half_dlat = (lat_b - lat_a) / 2.0;
    let half_dlng = (lng_b - lng_a) / 2.0;
    let h = half_dlat.sin().powi(2) + lat_a.cos() * lat_b.cos() * half_dlng.sin().powi(2);
    2.0 * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn filter(value: serde_json::Value) -> Filter {
        Filter::from(doc(value))
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(matches(&doc(json!({ "a": 1 })), &Filter::empty()).unwrap());
        assert!(matches(&Document::new(), &Filter::empty()).unwrap());
    }

    #[test]
    fn test_literal_equality_no_coercion() {
        let d = doc(json!({ "age": 30 }));
        assert!(matches(&d, &filter(json!({ "age": 30 }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "age": "30" }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "age": 31 }))).unwrap());
    }

    #[test]
    fn test_oid_wrapper_matches_literally() {
        let d = doc(json!({ "_id": { "$oid": "507f1f77bcf86cd799439011" } }));
        assert!(matches(
            &d,
            &filter(json!({ "_id": { "$oid": "507f1f77bcf86cd799439011" } }))
        )
        .unwrap());
        assert!(!matches(&d, &filter(json!({ "_id": "507f1f77bcf86cd799439011" }))).unwrap());
    }

    #[test]
    fn test_plain_subdocument_matches_literally() {
        let d = doc(json!({ "meta": { "a": 1 } }));
        assert!(matches(&d, &filter(json!({ "meta": { "a": 1 } }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "meta": { "a": 2 } }))).unwrap());
    }

    #[test]
    fn test_ne_matches_when_field_missing() {
        let present = doc(json!({ "state": "new" }));
        let missing = doc(json!({ "other": 1 }));
        let f = filter(json!({ "state": { "$ne": "gone" } }));
        assert!(matches(&present, &f).unwrap());
        assert!(matches(&missing, &f).unwrap());
        assert!(!matches(&doc(json!({ "state": "gone" })), &f).unwrap());
    }

    #[test]
    fn test_range_operators() {
        let d = doc(json!({ "age": 25 }));
        assert!(matches(&d, &filter(json!({ "age": { "$gte": 18, "$lt": 65 } }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "age": { "$gt": 25 } }))).unwrap());
        assert!(matches(&d, &filter(json!({ "age": { "$lte": 25 } }))).unwrap());
        // Mixed types never satisfy a range.
        assert!(!matches(&d, &filter(json!({ "age": { "$gt": "old" } }))).unwrap());
    }

    #[test]
    fn test_string_ranges_are_lexicographic() {
        let d = doc(json!({ "name": "carol" }));
        assert!(matches(&d, &filter(json!({ "name": { "$gt": "bob" } }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "name": { "$lt": "bob" } }))).unwrap());
    }

    #[test]
    fn test_in_membership() {
        let d = doc(json!({ "team": "red" }));
        assert!(matches(&d, &filter(json!({ "team": { "$in": ["red", "blue"] } }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "team": { "$in": ["green"] } }))).unwrap());

        let err = matches(&d, &filter(json!({ "team": { "$in": "red" } }))).unwrap_err();
        assert!(err.to_string().contains("$in"));
    }

    #[test]
    fn test_regex_match() {
        let d = doc(json!({ "name": "Adamant" }));
        assert!(matches(&d, &filter(json!({ "name": { "$regex": "^Ad" } }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "name": { "$regex": "^ad" } }))).unwrap());
        assert!(matches(
            &d,
            &filter(json!({ "name": { "$regex": "^ad", "$options": "i" } }))
        )
        .unwrap());
    }

    #[test]
    fn test_regex_invalid_pattern_is_an_error() {
        let d = doc(json!({ "name": "x" }));
        let err = matches(&d, &filter(json!({ "name": { "$regex": "(" } }))).unwrap_err();
        assert!(matches!(err, StoreError::InvalidQuery(_)));
    }

    #[test]
    fn test_within_circle() {
        // Points a fraction of a degree apart; radius of 0.01 rad is ~63 km.
        let near = doc(json!({ "location": [-122.41, 37.77] }));
        let far = doc(json!({ "location": [-70.0, 40.0] }));
        let f = filter(json!({
            "location": { "$within": { "$centerSphere": [[-122.42, 37.78], 0.01] } }
        }));
        assert!(matches(&near, &f).unwrap());
        assert!(!matches(&far, &f).unwrap());
    }

    #[test]
    fn test_within_non_point_field_does_not_match() {
        let d = doc(json!({ "location": "home" }));
        let f = filter(json!({
            "location": { "$within": { "$centerSphere": [[0.0, 0.0], 1.0] } }
        }));
        assert!(!matches(&d, &f).unwrap());
    }

    #[test]
    fn test_within_malformed_sphere_is_an_error() {
        let d = doc(json!({ "location": [0.0, 0.0] }));
        let f = filter(json!({ "location": { "$within": { "$centerSphere": [3] } } }));
        assert!(matches(&d, &f).is_err());
    }

    #[test]
    fn test_unknown_operator_is_an_error() {
        let d = doc(json!({ "a": 1 }));
        let err = matches(&d, &filter(json!({ "a": { "$bogus": 2 } }))).unwrap_err();
        assert!(err.to_string().contains("$bogus"));

        // Also when it follows a recognised operator that matched.
        let err = matches(&d, &filter(json!({ "a": { "$ne": 5, "$bogus": 2 } }))).unwrap_err();
        assert!(err.to_string().contains("$bogus"));
    }

    #[test]
    fn test_constraints_and_across_fields() {
        let d = doc(json!({ "a": 1, "b": 2 }));
        assert!(matches(&d, &filter(json!({ "a": 1, "b": { "$gte": 2 } }))).unwrap());
        assert!(!matches(&d, &filter(json!({ "a": 1, "b": { "$gte": 3 } }))).unwrap());
    }
}
