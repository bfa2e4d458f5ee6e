//! # Document Sorting
//!
//! Stable multi-key sort over matched documents, honouring the sort
//! specification's key order: earlier keys dominate, later keys break ties.

use std::cmp::Ordering;

use serde_json::Value;

use crate::store::types::Document;

/// Sorts documents in place according to a sort specification.
///
/// Each entry maps a field name to a direction; a negative number means
/// descending, anything else ascending. The sort is stable, so documents
/// equal under every key keep their stored order.
pub fn sort_documents(documents: &mut [Document], spec: &Document) {
    documents.sort_by(|a, b| {
        for (field, direction) in spec {
            let ordering = compare_values(a.get(field), b.get(field));
            let ordering = if is_descending(direction) {
                ordering.reverse()
            } else {
                ordering
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn is_descending(direction: &Value) -> bool {
    direction.as_f64().map_or(false, |d| d < 0.0)
}

/// Compares two field values for sorting.
///
/// Ordering rules:
/// - a missing field sorts before any present value
/// - across types: null < bool < number < string
/// - within a type, natural ordering; arrays and objects compare equal
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a_val), Some(b_val)) => {
            let type_order = |v: &Value| -> u8 {
                match v {
                    Value::Null => 0,
                    Value::Bool(_) => 1,
                    Value::Number(_) => 2,
                    Value::String(_) => 3,
                    Value::Array(_) => 4,
                    Value::Object(_) => 5,
                }
            };

            let a_type = type_order(a_val);
            let b_type = type_order(b_val);
            if a_type != b_type {
                return a_type.cmp(&b_type);
            }

            match (a_val, b_val) {
                (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                (Value::Number(a_n), Value::Number(b_n)) => {
                    let a_f = a_n.as_f64().unwrap_or(0.0);
                    let b_f = b_n.as_f64().unwrap_or(0.0);
                    a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                }
                (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                _ => Ordering::Equal,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn docs(values: Vec<serde_json::Value>) -> Vec<Document> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    fn spec(value: serde_json::Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn field(documents: &[Document], name: &str) -> Vec<Value> {
        documents
            .iter()
            .map(|d| d.get(name).cloned().unwrap_or(Value::Null))
            .collect()
    }

    #[test]
    fn test_sort_ascending() {
        let mut d = docs(vec![
            json!({ "age": 30 }),
            json!({ "age": 20 }),
            json!({ "age": 25 }),
        ]);
        sort_documents(&mut d, &spec(json!({ "age": 1 })));
        assert_eq!(field(&d, "age"), vec![json!(20), json!(25), json!(30)]);
    }

    #[test]
    fn test_sort_descending() {
        let mut d = docs(vec![
            json!({ "age": 30 }),
            json!({ "age": 20 }),
            json!({ "age": 25 }),
        ]);
        sort_documents(&mut d, &spec(json!({ "age": -1 })));
        assert_eq!(field(&d, "age"), vec![json!(30), json!(25), json!(20)]);
    }

    #[test]
    fn test_sort_multi_key_breaks_ties_in_spec_order() {
        let mut d = docs(vec![
            json!({ "team": "red", "age": 30 }),
            json!({ "team": "blue", "age": 40 }),
            json!({ "team": "red", "age": 20 }),
        ]);
        sort_documents(&mut d, &spec(json!({ "team": 1, "age": -1 })));
        assert_eq!(
            field(&d, "age"),
            vec![json!(40), json!(30), json!(20)],
        );
        assert_eq!(
            field(&d, "team"),
            vec![json!("blue"), json!("red"), json!("red")],
        );
    }

    #[test]
    fn test_sort_is_stable() {
        let mut d = docs(vec![
            json!({ "age": 25, "tag": "first" }),
            json!({ "age": 25, "tag": "second" }),
            json!({ "age": 25, "tag": "third" }),
        ]);
        sort_documents(&mut d, &spec(json!({ "age": 1 })));
        assert_eq!(
            field(&d, "tag"),
            vec![json!("first"), json!("second"), json!("third")],
        );
    }

    #[test]
    fn test_missing_fields_sort_first() {
        let mut d = docs(vec![
            json!({ "age": 30 }),
            json!({ "name": "no age" }),
            json!({ "age": 20 }),
        ]);
        sort_documents(&mut d, &spec(json!({ "age": 1 })));
        assert_eq!(field(&d, "age"), vec![json!(null), json!(20), json!(30)]);
    }

    #[test]
    fn test_cross_type_ordering() {
        let mut d = docs(vec![
            json!({ "v": "text" }),
            json!({ "v": 7 }),
            json!({ "v": true }),
            json!({ "v": null }),
        ]);
        sort_documents(&mut d, &spec(json!({ "v": 1 })));
        assert_eq!(
            field(&d, "v"),
            vec![json!(null), json!(true), json!(7), json!("text")],
        );
    }
}
